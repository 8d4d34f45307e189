use std::fmt;
use std::mem;

use crate::word::Word;

/// A read tree: atoms wrap a single word, lists hold children in source
/// order. Dropping a node drops everything beneath it.
///
/// Every walk over a tree (drop, display, comparison, counting) uses an
/// explicit work list, so arbitrarily deep input cannot exhaust the stack.
#[derive(Debug)]
pub enum Node {
    Atom(Word),
    List(Vec<Node>),
}

impl Node {
    pub fn atom(word: impl Into<Word>) -> Node {
        Node::Atom(word.into())
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Node::Atom(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Node::List(_))
    }

    pub fn word(&self) -> Option<&Word> {
        match self {
            Node::Atom(w) => Some(w),
            Node::List(_) => None,
        }
    }

    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Atom(_) => None,
            Node::List(children) => Some(children.as_slice()),
        }
    }

    /// Number of atoms anywhere in the tree.
    pub fn atom_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Node::Atom(_) => count += 1,
                Node::List(children) => pending.extend(children),
            }
        }
        count
    }

    /// Nesting depth; an atom is 0 and an empty list is 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((node, above)) = pending.pop() {
            if let Node::List(children) = node {
                deepest = deepest.max(above + 1);
                pending.extend(children.iter().map(|child| (child, above + 1)));
            }
        }
        deepest
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let Node::List(children) = self else {
            return;
        };
        if children.iter().all(Node::is_atom) {
            return;
        }

        let mut pending = mem::take(children);
        while let Some(mut node) = pending.pop() {
            if let Node::List(grandchildren) = &mut node {
                pending.append(grandchildren);
            }
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Node::Atom(a), Node::Atom(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (Node::List(a), Node::List(b)) => {
                    if a.len() != b.len() {
                        return false;
                    }
                    pending.extend(a.iter().zip(b));
                }
                _ => return false,
            }
        }
        true
    }
}

enum Step<'a> {
    Visit(&'a Node),
    Space,
    Close,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut steps = vec![Step::Visit(self)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Node::Atom(word)) => write!(f, "{word}")?,
                Step::Visit(Node::List(children)) => {
                    f.write_str("[")?;
                    steps.push(Step::Close);
                    for (i, child) in children.iter().enumerate().rev() {
                        steps.push(Step::Visit(child));
                        if i > 0 {
                            steps.push(Step::Space);
                        }
                    }
                }
                Step::Space => f.write_str(" ")?,
                Step::Close => f.write_str("]")?,
            }
        }
        Ok(())
    }
}

//! Arity-directed bottom-up tree reduction
//!
//! Prefix ordered items (an operator followed by its operands) are folded
//! into a tree with a single stack of pending nodes. Every item becomes a
//! pending node; whenever the node on top has all of its children it is
//! assembled and handed to the node below it, which may complete in turn.
//! The first node that completes with nothing below it is the root.
//!
//! The reducer knows nothing about the tree it builds. Callers describe
//! how many children each item takes ([`Arity`]), in which order slots are
//! filled ([`SlotOrder`]) and how a complete node is assembled.

/// Order in which a pending node receives its completed children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOrder {
    /// The first child to complete is the leftmost one
    LeftToRight,
    /// The first child to complete is the rightmost one
    ///
    /// This is the order produced by reversing a postfix sequence.
    RightToLeft,
}

/// Number of children an item expects before it is complete
pub trait Arity {
    fn arity(&self) -> usize;
}

/// Reasons a prefix sequence does not describe exactly one tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReduceError {
    #[error("nothing to reduce")]
    Empty,
    #[error("input ended while {pending} operator(s) still expected operands")]
    Incomplete { pending: usize },
    #[error("{remaining} item(s) left over after the expression was complete")]
    Trailing { remaining: usize },
    #[error("operator could not be assembled from its operands")]
    Rejected,
}

struct Pending<K, N> {
    kind: K,
    children: Vec<N>,
}

impl<K: Arity, N> Pending<K, N> {
    fn new(kind: K) -> Self {
        Self {
            children: Vec::with_capacity(kind.arity()),
            kind,
        }
    }

    fn is_complete(&self) -> bool {
        self.children.len() >= self.kind.arity()
    }
}

/// Reduces a prefix ordered sequence into a single tree
///
/// `assemble` receives a kind together with exactly `arity` children in
/// left to right order, whatever the slot order was. Returning `None`
/// rejects the node and aborts the reduction.
pub fn reduce<I, K, N, F>(items: I, order: SlotOrder, mut assemble: F) -> Result<N, ReduceError>
where
    I: IntoIterator<Item = K>,
    K: Arity,
    F: FnMut(K, Vec<N>) -> Option<N>,
{
    let mut items = items.into_iter();
    let mut stack: Vec<Pending<K, N>> = Vec::new();
    let mut seen = false;

    while let Some(kind) = items.next() {
        seen = true;

        let mut top = Pending::new(kind);

        loop {
            if !top.is_complete() {
                stack.push(top);
                break;
            }

            let Pending { kind, mut children } = top;

            if order == SlotOrder::RightToLeft {
                children.reverse();
            }

            let node = assemble(kind, children).ok_or(ReduceError::Rejected)?;

            match stack.pop() {
                Some(mut parent) => {
                    parent.children.push(node);
                    top = parent;
                }
                None => {
                    let remaining = items.by_ref().count();

                    if remaining > 0 {
                        return Err(ReduceError::Trailing { remaining });
                    }

                    return Ok(node);
                }
            }
        }
    }

    if !seen {
        return Err(ReduceError::Empty);
    }

    Err(ReduceError::Incomplete {
        pending: stack.len(),
    })
}

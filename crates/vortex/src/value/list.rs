//! Homogeneous lists and their set algebra

use serde::Serialize;

use super::{Result, Value, ValueError};

/// An ordered list whose elements all share one runtime type.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct List {
    items: Vec<Value>,
}

impl List {
    /// Fails with `UnhomogeneousType` at the first element whose type differs
    /// from the first element's.
    pub fn new(items: Vec<Value>) -> Result<Self> {
        let mismatch = items
            .first()
            .and_then(|first| Some((first, items.iter().find(|item| !item.same_type(first))?)));
        if let Some((first, other)) = mismatch {
            return Err(ValueError::UnhomogeneousType {
                expected: first.type_label(),
                found: other.type_label(),
            });
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }

    /// Sorted-merge intersection; elements of both sides in ascending order.
    pub fn intersect(&self, other: &List) -> Result<List> {
        self.check_compatible(other, "and")?;
        let items = merge(sorted(&self.items)?, sorted(&other.items)?, false)?;
        Ok(List { items })
    }

    /// Sorted-merge union; matched pairs are emitted once.
    pub fn union(&self, other: &List) -> Result<List> {
        self.check_compatible(other, "or")?;
        let items = merge(sorted(&self.items)?, sorted(&other.items)?, true)?;
        Ok(List { items })
    }

    pub fn repr(&self) -> String {
        let items: Vec<String> = self.items.iter().map(Value::repr).collect();
        format!("[{}]", items.join(", "))
    }

    /// Both lists must hold the same element type. An empty list has no
    /// element type and combines with anything.
    fn check_compatible(&self, other: &List, op: &'static str) -> Result<()> {
        match (self.items.first(), other.items.first()) {
            (Some(a), Some(b)) if !a.same_type(b) => Err(ValueError::InvalidOperation {
                op,
                left: a.kind(),
                right: b.kind(),
            }),
            _ => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Stable ascending sort by `less_than`. Comparison errors abort the sort.
fn sorted(items: &[Value]) -> Result<Vec<Value>> {
    if items.len() <= 1 {
        return Ok(items.to_vec());
    }
    let (left, right) = items.split_at(items.len() / 2);
    let mut left = sorted(left)?.into_iter().peekable();
    let mut right = sorted(right)?.into_iter().peekable();

    let mut out = Vec::with_capacity(items.len());
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => r.less_than(l)?,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        out.extend(if take_right { right.next() } else { left.next() });
    }
    Ok(out)
}

/// Two-pointer walk over sorted inputs. Matched pairs are emitted once;
/// unmatched elements are emitted only when `keep_unmatched` (union).
fn merge(a: Vec<Value>, b: Vec<Value>, keep_unmatched: bool) -> Result<Vec<Value>> {
    let mut out = Vec::new();
    let (mut p1, mut p2) = (0, 0);

    while p1 < a.len() && p2 < b.len() {
        if a[p1].less_than(&b[p2])? {
            if keep_unmatched {
                out.push(a[p1].clone());
            }
            p1 += 1;
        } else if a[p1].equal(&b[p2])? {
            out.push(a[p1].clone());
            p1 += 1;
            p2 += 1;
        } else {
            if keep_unmatched {
                out.push(b[p2].clone());
            }
            p2 += 1;
        }
    }

    if keep_unmatched {
        out.extend_from_slice(&a[p1..]);
        out.extend_from_slice(&b[p2..]);
    }
    Ok(out)
}

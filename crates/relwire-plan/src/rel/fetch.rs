//! Fetch: offset/limit over the input.

use relwire_core::error::{Error, Result};
use relwire_proto::rel::{FetchRel, RelCommon};

use super::RelNode;

/// `OFFSET .. LIMIT ..`. A `None` count means all remaining rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetch {
    input: Box<RelNode>,
    offset: u64,
    count: Option<u64>,
}

impl Fetch {
    pub fn new(input: RelNode, offset: u64, count: Option<u64>) -> Result<Self> {
        if i64::try_from(offset).is_err() {
            return Err(Error::malformed("fetch", format!("offset {offset} exceeds i64")));
        }
        if let Some(c) = count {
            if i64::try_from(c).is_err() {
                return Err(Error::malformed("fetch", format!("count {c} exceeds i64")));
            }
        }
        Ok(Self {
            input: Box::new(input),
            offset,
            count,
        })
    }

    pub fn input(&self) -> &RelNode {
        &self.input
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn count(&self) -> Option<u64> {
        self.count
    }

    pub(crate) fn encode(&self, common: RelCommon) -> FetchRel {
        // both bounds were checked against i64 at construction
        FetchRel {
            common: Some(common),
            input: Some(Box::new(self.input.encode())),
            offset: self.offset as i64,
            count: self.count.map(|c| c as i64).unwrap_or(-1),
        }
    }
}

#[cfg(test)]
mod tests {
    use relwire_proto::rel::RelType;

    use super::*;
    use crate::rel::test_util::*;

    fn encoded(node: RelNode) -> FetchRel {
        match node.encode().rel_type {
            Some(RelType::Fetch(f)) => *f,
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn unbounded_count_is_minus_one() {
        let f = encoded(Fetch::new(scan("t"), 10, None).unwrap().into());
        assert_eq!(f.offset, 10);
        assert_eq!(f.count, -1);
    }

    #[test]
    fn bounded_count() {
        let f = encoded(Fetch::new(scan("t"), 0, Some(25)).unwrap().into());
        assert_eq!(f.offset, 0);
        assert_eq!(f.count, 25);
    }

    #[test]
    fn oversized_bounds_rejected() {
        assert!(Fetch::new(scan("t"), u64::MAX, None).unwrap_err().is_malformed());
        assert!(Fetch::new(scan("t"), 0, Some(u64::MAX)).unwrap_err().is_malformed());
    }
}

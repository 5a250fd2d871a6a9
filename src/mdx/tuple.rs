//! Tuples - ordered groupings of members into one coordinate point.

use super::error::MdxResult;
use super::member::MemberExpr;
use super::token::TokenStream;

/// An ordered list of members. Position is significant.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct MdxTuple {
    pub members: Vec<MemberExpr>,
}

impl MdxTuple {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(members: Vec<MemberExpr>) -> Self {
        Self { members }
    }

    pub fn with_member(mut self, member: MemberExpr) -> Self {
        self.members.push(member);
        self
    }

    pub fn push(&mut self, member: MemberExpr) {
        self.members.push(member);
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// `()` when empty, the bare member for one, `(a,b,...)` otherwise.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        match self.members.as_slice() {
            [] => {
                ts.lparen().rparen();
            }
            [only] => {
                ts.append(&only.to_tokens());
            }
            members => {
                ts.lparen();
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        ts.comma();
                    }
                    ts.append(&m.to_tokens());
                }
                ts.rparen();
            }
        }
        ts
    }

    pub fn validate(&self) -> MdxResult<()> {
        self.members.iter().try_for_each(MemberExpr::validate)
    }

    pub fn to_mdx(&self) -> MdxResult<String> {
        self.validate()?;
        Ok(self.to_tokens().serialize())
    }
}

impl From<MemberExpr> for MdxTuple {
    fn from(member: MemberExpr) -> Self {
        Self {
            members: vec![member],
        }
    }
}

impl FromIterator<MemberExpr> for MdxTuple {
    fn from_iter<I: IntoIterator<Item = MemberExpr>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

//! Member expressions - atomic references into dimensional space.

use super::error::{MdxError, MdxResult};
use super::names::{
    dimension_name_from_unique_name, element_name_from_unique_name,
    hierarchy_name_from_unique_name, trim_brackets,
};
use super::token::{Token, TokenStream};

// =============================================================================
// Hierarchy Reference
// =============================================================================

/// A `(dimension, hierarchy)` pair.
///
/// Names are stored without brackets. An empty hierarchy means the
/// dimension's default hierarchy of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HierarchyRef {
    pub dimension: String,
    pub hierarchy: String,
}

impl HierarchyRef {
    pub fn new(dimension: &str, hierarchy: &str) -> Self {
        let dimension = trim_brackets(dimension).to_string();
        let hierarchy = match trim_brackets(hierarchy) {
            "" => dimension.clone(),
            h => h.to_string(),
        };
        Self {
            dimension,
            hierarchy,
        }
    }

    /// The default hierarchy of a dimension.
    pub fn dimension(dimension: &str) -> Self {
        Self::new(dimension, "")
    }

    /// True when the hierarchy name differs from the dimension name.
    pub fn is_alternate(&self) -> bool {
        !self.hierarchy.is_empty() && self.hierarchy != self.dimension
    }

    /// `[Dim].[Hier]`, always with both segments.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.dimension.clone()))
            .dot()
            .push(Token::Ident(self.hierarchy.clone()));
        ts
    }

    /// `[Dim]` or `[Dim].[Hier]` - the prefix of a member unique name.
    fn prefix_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.dimension.clone()));
        if self.is_alternate() {
            ts.dot().push(Token::Ident(self.hierarchy.clone()));
        }
        ts
    }

    pub fn validate(&self) -> MdxResult<()> {
        if self.dimension.is_empty() {
            return Err(MdxError::invalid("dimension name is empty"));
        }
        Ok(())
    }
}

// =============================================================================
// Member Expression
// =============================================================================

/// A reference to a member, or something usable where a member is expected.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberExpr {
    /// A concrete element: `[Dim].[Hier].[Elem]`.
    Element {
        hierarchy: HierarchyRef,
        name: String,
    },

    /// The current member placeholder: `[Dim].[Hier].CurrentMember`.
    CurrentMember {
        hierarchy: HierarchyRef,
    },

    /// A dimension property (attribute): `[Dim].[Hier].[Attr]`.
    Property {
        hierarchy: HierarchyRef,
        attribute: String,
    },

    /// A member defined inline by a formula in the `WITH` clause.
    Calculated {
        hierarchy: HierarchyRef,
        name: String,
        formula: String,
    },
}

/// Element reference. Empty hierarchy means the dimension's own hierarchy.
pub fn member(dimension: &str, hierarchy: &str, element: &str) -> MemberExpr {
    MemberExpr::Element {
        hierarchy: HierarchyRef::new(dimension, hierarchy),
        name: trim_brackets(element).to_string(),
    }
}

/// Element reference parsed from a unique name such as
/// `[Region].[Geography].[North]` or `[Year].[2024]`.
pub fn member_from_unique_name(unique_name: &str) -> MemberExpr {
    MemberExpr::Element {
        hierarchy: HierarchyRef::new(
            &dimension_name_from_unique_name(unique_name),
            &hierarchy_name_from_unique_name(unique_name),
        ),
        name: element_name_from_unique_name(unique_name),
    }
}

/// `CurrentMember` placeholder on a hierarchy.
pub fn current_member(dimension: &str, hierarchy: &str) -> MemberExpr {
    MemberExpr::CurrentMember {
        hierarchy: HierarchyRef::new(dimension, hierarchy),
    }
}

/// Dimension property (attribute) reference.
pub fn property(dimension: &str, hierarchy: &str, attribute: &str) -> MemberExpr {
    MemberExpr::Property {
        hierarchy: HierarchyRef::new(dimension, hierarchy),
        attribute: trim_brackets(attribute).to_string(),
    }
}

/// Calculated member. The formula is kept verbatim.
pub fn calculated(dimension: &str, hierarchy: &str, name: &str, formula: &str) -> MemberExpr {
    MemberExpr::Calculated {
        hierarchy: HierarchyRef::new(dimension, hierarchy),
        name: trim_brackets(name).to_string(),
        formula: formula.to_string(),
    }
}

impl MemberExpr {
    pub fn hierarchy(&self) -> &HierarchyRef {
        match self {
            MemberExpr::Element { hierarchy, .. }
            | MemberExpr::CurrentMember { hierarchy }
            | MemberExpr::Property { hierarchy, .. }
            | MemberExpr::Calculated { hierarchy, .. } => hierarchy,
        }
    }

    pub fn is_calculated(&self) -> bool {
        matches!(self, MemberExpr::Calculated { .. })
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = self.hierarchy().prefix_tokens();
        match self {
            MemberExpr::Element { name, .. } | MemberExpr::Calculated { name, .. } => {
                ts.dot().push(Token::Ident(name.clone()));
            }
            MemberExpr::CurrentMember { .. } => {
                ts.dot().push(Token::CurrentMember);
            }
            MemberExpr::Property { attribute, .. } => {
                ts.dot().push(Token::Ident(attribute.clone()));
            }
        }
        ts
    }

    /// The textual reference, e.g. `[Dim].[Elem]` or `[Dim].[Hier].[Elem]`.
    pub fn unique_name(&self) -> String {
        self.to_tokens().serialize()
    }

    /// `MEMBER <unique name> AS <formula>` for calculated members.
    pub fn declaration_tokens(&self) -> MdxResult<TokenStream> {
        match self {
            MemberExpr::Calculated { formula, .. } => {
                let mut ts = TokenStream::new();
                ts.push(Token::Member)
                    .space()
                    .append(&self.to_tokens())
                    .space()
                    .push(Token::As)
                    .space()
                    .push(Token::Raw(formula.clone()));
                Ok(ts)
            }
            other => Err(MdxError::invalid(format!(
                "{} is not a calculated member and cannot be declared in WITH",
                other.unique_name()
            ))),
        }
    }

    pub fn validate(&self) -> MdxResult<()> {
        self.hierarchy().validate()?;
        match self {
            MemberExpr::Element { name, .. } if name.is_empty() => {
                Err(MdxError::invalid("element name is empty"))
            }
            MemberExpr::Property { attribute, .. } if attribute.is_empty() => {
                Err(MdxError::invalid("property name is empty"))
            }
            MemberExpr::Calculated { name, formula, .. } => {
                if name.is_empty() {
                    Err(MdxError::invalid("calculated member name is empty"))
                } else if formula.trim().is_empty() {
                    Err(MdxError::invalid(format!(
                        "calculated member '{}' has no formula",
                        name
                    )))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for MemberExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.unique_name())
    }
}

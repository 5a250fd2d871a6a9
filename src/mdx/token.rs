//! MDX Tokens - the atomic units of MDX output.
//!
//! Every member, set and query renders itself into a [`TokenStream`];
//! quoting and escaping happen in exactly one place, [`Token::serialize`].

use super::names::{quote_bracket, quote_string};

/// MDX Token - every element the builder can emit.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    With,
    Member,
    As,
    On,
    NonEmpty,
    Or,
    All,
    Asc,
    Desc,

    // === Member / Set Properties ===
    CurrentMember,
    Children,
    AllMembers,

    // === Punctuation ===
    Comma,
    Dot,
    LParen,
    RParen,
    LBrace,
    RBrace,

    // === Comparison Operators ===
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,

    // === Whitespace ===
    Space,

    // === Dynamic Content ===
    /// Object name, rendered in brackets with `]` escaped.
    Ident(String),
    /// Integer literal
    LitInt(i64),
    /// String literal, rendered in single quotes.
    LitString(String),
    /// Function name, rendered exactly as given (`TM1SubsetToSet` keeps its casing).
    FunctionName(String),

    // === Escape Hatch ===
    /// MDX text passed to the output untouched.
    ///
    /// Used for calculated-member formulas and caller-supplied set
    /// expressions, which are MDX fragments in their own right.
    Raw(String),
}

impl Token {
    /// Serialize this token to MDX text.
    pub fn serialize(&self) -> String {
        match self {
            // Keywords
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::With => "WITH".into(),
            Token::Member => "MEMBER".into(),
            Token::As => "AS".into(),
            Token::On => "ON".into(),
            Token::NonEmpty => "NON EMPTY".into(),
            Token::Or => "OR".into(),
            Token::All => "ALL".into(),
            Token::Asc => "ASC".into(),
            Token::Desc => "DESC".into(),

            // Properties
            Token::CurrentMember => "CurrentMember".into(),
            Token::Children => "Children".into(),
            Token::AllMembers => "AllMembers".into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::LBrace => "{".into(),
            Token::RBrace => "}".into(),

            // Operators
            Token::Eq => "=".into(),
            Token::Ne => "<>".into(),
            Token::Lt => "<".into(),
            Token::Gt => ">".into(),
            Token::Lte => "<=".into(),
            Token::Gte => ">=".into(),

            Token::Space => " ".into(),

            // Dynamic
            Token::Ident(name) => quote_bracket(name),
            Token::LitInt(n) => n.to_string(),
            Token::LitString(s) => quote_string(s),
            Token::FunctionName(name) => name.clone(),

            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to MDX.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Serialize all tokens to an MDX string.
    pub fn serialize(&self) -> String {
        self.tokens.iter().map(|t| t.serialize()).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn dot(&mut self) -> &mut Self {
        self.push(Token::Dot)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
    pub fn lbrace(&mut self) -> &mut Self {
        self.push(Token::LBrace)
    }
    pub fn rbrace(&mut self) -> &mut Self {
        self.push(Token::RBrace)
    }

    /// Emit `NAME(arg0, arg1, ...)` with `", "` between arguments.
    pub fn call(&mut self, name: &str, args: &[TokenStream]) -> &mut Self {
        self.push(Token::FunctionName(name.into())).lparen();
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.comma().space();
            }
            self.append(arg);
        }
        self.rparen()
    }
}

impl From<Token> for TokenStream {
    fn from(token: Token) -> Self {
        Self {
            tokens: vec![token],
        }
    }
}

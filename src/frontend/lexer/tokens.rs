//! Token types for the scar lexer.

use phf::phf_map;

use crate::frontend::ast::Span;
use crate::frontend::intern::StringId;
use crate::frontend::types::TypeInfo;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Token kinds for scar.
///
/// Literal payloads live directly in the variant: an unsigned 64-bit integer,
/// a 64-bit float, or an interned string id, tagged by the kind. At most one
/// is ever populated per token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    // ========== Keywords ==========
    Func,     // function declaration
    If,       // branch
    Else,     // branch alternative
    For,      // for loop
    While,    // while loop
    Loop,     // infinite loop (desugars to while(true))
    Var,      // variable declaration
    Continue, // continue to the next loop iteration
    Break,    // break out of a loop
    Return,   // return statement
    True,     // boolean literal
    False,    // boolean literal
    As,       // cast suffix operator

    // ========== Type keywords ==========
    // Each carries the canonical TypeInfo so the parser never re-maps names.
    TypeName(TypeInfo),

    // ========== Identifiers and literals ==========
    Ident(StringId),
    Int(u64),
    Float(f64),
    Str(StringId),
    CharLit(char),

    // ========== Punctuation ==========
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    LBracket,   // [
    RBracket,   // ]
    Comma,      // ,
    Semi,       // ;
    Colon,      // :
    ColonColon, // ::
    Dot,        // .
    Arrow,      // ->

    // ========== Operators ==========
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    Eq,         // =
    EqEq,       // ==
    BangEq,     // !=
    Lt,         // <
    LtEq,       // <=
    Gt,         // >
    GtEq,       // >=
    AmpAmp,     // &&
    PipePipe,   // ||
    Amp,        // &
    Pipe,       // |
    Caret,      // ^
    Tilde,      // ~
    Bang,       // !
    PlusPlus,   // ++ (lexed, rejected by the parser)
    MinusMinus, // -- (lexed, rejected by the parser)

    // ========== Special ==========
    /// Emitted for an unrecognized symbol after the error is reported, so
    /// lexing continues past one bad character.
    Invalid,
    /// Always the final element of a token stream.
    Eof,
}

impl TokenKind {
    /// Human-readable description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Func => "'func'".to_string(),
            TokenKind::If => "'if'".to_string(),
            TokenKind::Else => "'else'".to_string(),
            TokenKind::For => "'for'".to_string(),
            TokenKind::While => "'while'".to_string(),
            TokenKind::Loop => "'loop'".to_string(),
            TokenKind::Var => "'var'".to_string(),
            TokenKind::Continue => "'continue'".to_string(),
            TokenKind::Break => "'break'".to_string(),
            TokenKind::Return => "'return'".to_string(),
            TokenKind::True => "'true'".to_string(),
            TokenKind::False => "'false'".to_string(),
            TokenKind::As => "'as'".to_string(),
            TokenKind::TypeName(ty) => format!("type '{ty}'"),
            TokenKind::Ident(_) => "identifier".to_string(),
            TokenKind::Int(_) => "integer literal".to_string(),
            TokenKind::Float(_) => "float literal".to_string(),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::CharLit(_) => "char literal".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Semi => "';'".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::ColonColon => "'::'".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Arrow => "'->'".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Percent => "'%'".to_string(),
            TokenKind::Eq => "'='".to_string(),
            TokenKind::EqEq => "'=='".to_string(),
            TokenKind::BangEq => "'!='".to_string(),
            TokenKind::Lt => "'<'".to_string(),
            TokenKind::LtEq => "'<='".to_string(),
            TokenKind::Gt => "'>'".to_string(),
            TokenKind::GtEq => "'>='".to_string(),
            TokenKind::AmpAmp => "'&&'".to_string(),
            TokenKind::PipePipe => "'||'".to_string(),
            TokenKind::Amp => "'&'".to_string(),
            TokenKind::Pipe => "'|'".to_string(),
            TokenKind::Caret => "'^'".to_string(),
            TokenKind::Tilde => "'~'".to_string(),
            TokenKind::Bang => "'!'".to_string(),
            TokenKind::PlusPlus => "'++'".to_string(),
            TokenKind::MinusMinus => "'--'".to_string(),
            TokenKind::Invalid => "invalid token".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

/// Keyword lookup table using a perfect hash map for O(1) lookup.
///
/// Maps source text to payload-less `TokenKind` variants. When the lexer
/// scans an identifier it checks this map to decide keyword vs identifier.
/// Type names carry their canonical [`TypeInfo`] so the lexer keyword table,
/// AST, verifier, and codegen all share one type enumeration.
pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "func" => TokenKind::Func,
    "if" => TokenKind::If,
    "else" => TokenKind::Else,
    "for" => TokenKind::For,
    "while" => TokenKind::While,
    "loop" => TokenKind::Loop,
    "var" => TokenKind::Var,
    "continue" => TokenKind::Continue,
    "break" => TokenKind::Break,
    "return" => TokenKind::Return,
    "true" => TokenKind::True,
    "false" => TokenKind::False,
    "as" => TokenKind::As,
    "void" => TokenKind::TypeName(TypeInfo::Void),
    "bool" => TokenKind::TypeName(TypeInfo::Bool),
    "i8" => TokenKind::TypeName(TypeInfo::I8),
    "i16" => TokenKind::TypeName(TypeInfo::I16),
    "i32" => TokenKind::TypeName(TypeInfo::I32),
    "i64" => TokenKind::TypeName(TypeInfo::I64),
    "u8" => TokenKind::TypeName(TypeInfo::U8),
    "u16" => TokenKind::TypeName(TypeInfo::U16),
    "u32" => TokenKind::TypeName(TypeInfo::U32),
    "u64" => TokenKind::TypeName(TypeInfo::U64),
    "f32" => TokenKind::TypeName(TypeInfo::F32),
    "f64" => TokenKind::TypeName(TypeInfo::F64),
    "char" => TokenKind::TypeName(TypeInfo::Char),
    "str" => TokenKind::TypeName(TypeInfo::Str),
};

/// A token with its kind and source span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

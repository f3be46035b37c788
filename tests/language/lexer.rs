//! Integration tests for the lexer

use deftype_language::{Lexer, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize_all(source)
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !k.is_trivia())
        .collect()
}

#[test]
fn tokenize_declaration() {
    assert_eq!(
        kinds("(defdto Info (int? Age, string[] Tags))"),
        vec![
            TokenKind::LParen,
            TokenKind::Ident("defdto".to_string()),
            TokenKind::Ident("Info".to_string()),
            TokenKind::LParen,
            TokenKind::Ident("int".to_string()),
            TokenKind::Question,
            TokenKind::Ident("Age".to_string()),
            TokenKind::Comma,
            TokenKind::Ident("string".to_string()),
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Ident("Tags".to_string()),
            TokenKind::RParen,
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenize_conventions() {
    assert_eq!(
        kinds(":commands { inherit [App.ICommand] }"),
        vec![
            TokenKind::Keyword("commands".to_string()),
            TokenKind::LBrace,
            TokenKind::Ident("inherit".to_string()),
            TokenKind::LBracket,
            TokenKind::Ident("App.ICommand".to_string()),
            TokenKind::RBracket,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_are_trivia() {
    let tokens = Lexer::tokenize_all("; heading\n(namespace A) ; trailing");
    assert!(matches!(tokens[0].kind, TokenKind::Comment(_)));
    assert_eq!(
        kinds("; heading\n(namespace A) ; trailing"),
        kinds("(namespace A)")
    );
}

#[test]
fn spans_track_lines() {
    let tokens = Lexer::tokenize_all("(namespace A\n  (defdto B ()))");
    let b = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Ident("B".to_string()))
        .unwrap();
    assert_eq!(b.span.line, 2);
    assert_eq!(b.span.column, 11);
}

//! Unit tests for TokenStream

use crate::template::engine::tokenize::{find_end_tag, Delimiter, TokenKind, TokenStream};

#[test]
fn test_tokenstream_output_and_tag() {
    let tokens: Vec<_> = TokenStream::new("a {{ x | money }} b {% if y %}c{% endif %}").collect();
    assert_eq!(tokens.len(), 3);
    assert_eq!(
        tokens[0].kind,
        TokenKind::Output {
            expr: "x | money".to_string()
        }
    );
    assert_eq!(
        tokens[1].kind,
        TokenKind::Tag {
            name: "if".to_string(),
            args: "y".to_string()
        }
    );
    assert_eq!(
        tokens[2].kind,
        TokenKind::Tag {
            name: "endif".to_string(),
            args: String::new()
        }
    );
}

#[test]
fn test_tokenstream_positions() {
    let text = "ab{{ x }}cd";
    let tokens: Vec<_> = TokenStream::new(text).collect();
    assert_eq!(tokens[0].start, 2);
    assert_eq!(tokens[0].length, 7);
    assert_eq!(&text[tokens[0].start..tokens[0].end()], "{{ x }}");
}

#[test]
fn test_tokenstream_line_numbers() {
    let tokens: Vec<_> = TokenStream::new("line1\n{{ a }}\n\n{% b %}").collect();
    assert_eq!(tokens[0].line, 2);
    assert_eq!(tokens[1].line, 4);
}

#[test]
fn test_tokenstream_whitespace_control_flags() {
    let tokens: Vec<_> = TokenStream::new("{{- a -}}{%- b %}{{ c -}}").collect();
    assert!(tokens[0].trim_left && tokens[0].trim_right);
    assert!(tokens[1].trim_left && !tokens[1].trim_right);
    assert!(!tokens[2].trim_left && tokens[2].trim_right);
    assert_eq!(
        tokens[0].kind,
        TokenKind::Output {
            expr: "a".to_string()
        }
    );
}

#[test]
fn test_tokenstream_quotes_hide_closing_braces() {
    let tokens: Vec<_> = TokenStream::new(r#"{{ "}}" | append: '%}' }}"#).collect();
    assert_eq!(tokens.len(), 1);
    assert_eq!(
        tokens[0].kind,
        TokenKind::Output {
            expr: r#""}}" | append: '%}'"#.to_string()
        }
    );
}

#[test]
fn test_tokenstream_single_braces_are_text() {
    let tokens: Vec<_> = TokenStream::new("{ a } {b} %} }}").collect();
    assert!(tokens.is_empty());
}

#[test]
fn test_tokenstream_unclosed_reported_once() {
    let tokens: Vec<_> = TokenStream::new("ok {{ x }} then {% if").collect();
    assert_eq!(tokens.len(), 2);
    assert_eq!(
        tokens[1].kind,
        TokenKind::Unclosed {
            delimiter: Delimiter::Tag
        }
    );
}

#[test]
fn test_tokenstream_triple_brace() {
    let tokens: Vec<_> = TokenStream::new("{{{ x }}}").collect();
    assert_eq!(tokens.len(), 1);
    assert_eq!(
        tokens[0].kind,
        TokenKind::Output {
            expr: "{ x".to_string()
        }
    );
}

#[test]
fn test_find_end_tag_ignores_quotes() {
    let text = "{% raw %}{{ don't }}{%- endraw -%}";
    assert_eq!(find_end_tag(text, 9, "endraw"), Some(20));
    assert_eq!(find_end_tag(text, 9, "endcomment"), None);
    assert_eq!(find_end_tag("{% endrawx %}", 0, "endraw"), None);
}

#[test]
fn test_tokenstream_skip_to_resumes_scanning() {
    let text = "{% raw %}{{ ' {% endraw %}";
    let mut stream = TokenStream::new(text);
    let first = stream.next().unwrap();
    assert_eq!(first.end(), 9);
    stream.skip_to(14);
    let next = stream.next().unwrap();
    assert_eq!(next.start, 14);
    assert_eq!(
        next.kind,
        TokenKind::Tag {
            name: "endraw".to_string(),
            args: String::new()
        }
    );
}

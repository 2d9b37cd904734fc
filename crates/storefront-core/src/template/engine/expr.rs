//! Expression parsing: operands, filter pipelines and conditions

use serde_json::Value;

/// One step of a variable path
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Segment {
    /// `.name` or `["name"]`
    Key(String),
    /// `[0]`, negative counts from the end
    Index(i64),
}

/// `collection.products[0].title`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VariablePath {
    /// Source text, used in error messages
    pub source: String,
    pub root: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Literal(Value),
    /// The `empty` keyword, only meaningful in comparisons
    Empty,
    Variable(VariablePath),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FilterCall {
    pub name: String,
    pub args: Vec<Operand>,
    pub kwargs: Vec<(String, Operand)>,
}

/// `operand | filter | filter: arg, key: value`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Expression {
    pub source: String,
    pub base: Operand,
    pub filters: Vec<FilterCall>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Contains,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Condition {
    Truthy(Operand),
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

/// Lexical unit inside a tag or output token
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Lexeme {
    Str(String),
    Num(Value),
    /// Identifier or variable path (may contain `.` and `[...]`)
    Word(String),
    Pipe,
    Colon,
    Comma,
    Assign,
    Op(CompareOp),
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b'?')
}

/// Split token content into lexemes
pub(crate) fn lex(src: &str) -> Result<Vec<Lexeme>, String> {
    let bytes = src.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            b'|' => {
                out.push(Lexeme::Pipe);
                i += 1;
            }
            b':' => {
                out.push(Lexeme::Colon);
                i += 1;
            }
            b',' => {
                out.push(Lexeme::Comma);
                i += 1;
            }
            b'"' | b'\'' => {
                let close = src[i + 1..]
                    .find(b as char)
                    .ok_or_else(|| format!("unterminated string in '{}'", src))?;
                out.push(Lexeme::Str(src[i + 1..i + 1 + close].to_string()));
                i += close + 2;
            }
            b'=' | b'!' | b'<' | b'>' => {
                let two = src.get(i..i + 2).unwrap_or("");
                let (lexeme, width) = match two {
                    "==" => (Lexeme::Op(CompareOp::Eq), 2),
                    "!=" | "<>" => (Lexeme::Op(CompareOp::Ne), 2),
                    "<=" => (Lexeme::Op(CompareOp::Le), 2),
                    ">=" => (Lexeme::Op(CompareOp::Ge), 2),
                    _ => match b {
                        b'<' => (Lexeme::Op(CompareOp::Lt), 1),
                        b'>' => (Lexeme::Op(CompareOp::Gt), 1),
                        b'=' => (Lexeme::Assign, 1),
                        _ => return Err(format!("unexpected '!' in '{}'", src)),
                    },
                };
                out.push(lexeme);
                i += width;
            }
            b'-' | b'0'..=b'9'
                if b != b'-' || bytes.get(i + 1).is_some_and(u8::is_ascii_digit) =>
            {
                let start = i;
                i += 1;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                let text = &src[start..i];
                let value = match text.parse::<i64>() {
                    Ok(n) => Value::from(n),
                    Err(_) => text
                        .parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .map(Value::Number)
                        .ok_or_else(|| format!("invalid number '{}'", text))?,
                };
                out.push(Lexeme::Num(value));
            }
            _ if is_word_byte(b) || b == b'[' => {
                let start = i;
                while i < bytes.len() {
                    if is_word_byte(bytes[i]) {
                        i += 1;
                    } else if bytes[i] == b'[' {
                        // Bracket segments may contain quoted keys
                        let close = find_bracket_end(src, i)
                            .ok_or_else(|| format!("unclosed '[' in '{}'", src))?;
                        i = close + 1;
                    } else {
                        break;
                    }
                }
                out.push(Lexeme::Word(src[start..i].to_string()));
            }
            _ => return Err(format!("unexpected character '{}' in '{}'", b as char, src)),
        }
    }

    Ok(out)
}

fn find_bracket_end(src: &str, open: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut quote = None;
    for (offset, &b) in bytes[open + 1..].iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b']' => return Some(open + 1 + offset),
            None => {}
        }
    }
    None
}

/// Parse a variable path such as `a.b[0]["c d"]`
pub(crate) fn parse_path(word: &str) -> Result<VariablePath, String> {
    let mut segments = Vec::new();
    let bytes = word.as_bytes();
    let root_end = word.find(['.', '[']).unwrap_or(word.len());
    let root = &word[..root_end];
    if root.is_empty() {
        return Err(format!("invalid variable '{}'", word));
    }

    let mut i = root_end;
    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                let end = word[i + 1..]
                    .find(['.', '['])
                    .map(|e| i + 1 + e)
                    .unwrap_or(word.len());
                let key = &word[i + 1..end];
                if key.is_empty() {
                    return Err(format!("empty segment in '{}'", word));
                }
                segments.push(Segment::Key(key.to_string()));
                i = end;
            }
            b'[' => {
                let close = find_bracket_end(word, i)
                    .ok_or_else(|| format!("unclosed '[' in '{}'", word))?;
                let inner = word[i + 1..close].trim();
                let segment = if let Some(key) = strip_quotes(inner) {
                    Segment::Key(key.to_string())
                } else {
                    Segment::Index(
                        inner
                            .parse::<i64>()
                            .map_err(|_| format!("invalid index '{}' in '{}'", inner, word))?,
                    )
                };
                segments.push(segment);
                i = close + 1;
            }
            _ => return Err(format!("invalid variable '{}'", word)),
        }
    }

    Ok(VariablePath {
        source: word.to_string(),
        root: root.to_string(),
        segments,
    })
}

fn strip_quotes(s: &str) -> Option<&str> {
    s.strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')))
}

fn word_operand(word: &str) -> Result<Operand, String> {
    Ok(match word {
        "true" => Operand::Literal(Value::Bool(true)),
        "false" => Operand::Literal(Value::Bool(false)),
        "nil" | "null" => Operand::Literal(Value::Null),
        "empty" | "blank" => Operand::Empty,
        _ => Operand::Variable(parse_path(word)?),
    })
}

/// Cursor over lexemes
pub(crate) struct Lexemes {
    items: Vec<Lexeme>,
    pos: usize,
}

impl Lexemes {
    pub fn new(src: &str) -> Result<Self, String> {
        Ok(Self {
            items: lex(src)?,
            pos: 0,
        })
    }

    pub fn peek(&self) -> Option<&Lexeme> {
        self.items.get(self.pos)
    }

    pub fn peek_at(&self, offset: usize) -> Option<&Lexeme> {
        self.items.get(self.pos + offset)
    }

    pub fn next(&mut self) -> Option<Lexeme> {
        let item = self.items.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    pub fn is_done(&self) -> bool {
        self.pos >= self.items.len()
    }

    /// Consume a specific keyword
    pub fn eat_word(&mut self, word: &str) -> bool {
        if matches!(self.peek(), Some(Lexeme::Word(w)) if w == word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn operand(&mut self) -> Result<Operand, String> {
        match self.next() {
            Some(Lexeme::Str(s)) => Ok(Operand::Literal(Value::String(s))),
            Some(Lexeme::Num(n)) => Ok(Operand::Literal(n)),
            Some(Lexeme::Word(w)) => word_operand(&w),
            Some(other) => Err(format!("expected a value, found {:?}", other)),
            None => Err("expected a value".to_string()),
        }
    }
}

/// Parse `operand | filter: args ...`
pub(crate) fn parse_expression(src: &str) -> Result<Expression, String> {
    let mut lexemes = Lexemes::new(src)?;
    let expression = parse_expression_from(&mut lexemes, src)?;
    if !lexemes.is_done() {
        return Err(format!("unexpected {:?} in '{}'", lexemes.peek(), src));
    }
    Ok(expression)
}

pub(crate) fn parse_expression_from(
    lexemes: &mut Lexemes,
    src: &str,
) -> Result<Expression, String> {
    let base = lexemes.operand()?;
    let mut filters = Vec::new();

    while matches!(lexemes.peek(), Some(Lexeme::Pipe)) {
        lexemes.next();
        let name = match lexemes.next() {
            Some(Lexeme::Word(w)) => w,
            _ => return Err(format!("expected filter name after '|' in '{}'", src)),
        };
        let mut call = FilterCall {
            name,
            args: Vec::new(),
            kwargs: Vec::new(),
        };

        if matches!(lexemes.peek(), Some(Lexeme::Colon)) {
            lexemes.next();
            loop {
                let keyword = match (lexemes.peek(), lexemes.peek_at(1)) {
                    (Some(Lexeme::Word(key)), Some(Lexeme::Colon)) => Some(key.clone()),
                    _ => None,
                };
                match keyword {
                    Some(key) => {
                        // key and its colon
                        lexemes.next();
                        lexemes.next();
                        call.kwargs.push((key, lexemes.operand()?));
                    }
                    None => call.args.push(lexemes.operand()?),
                }

                if matches!(lexemes.peek(), Some(Lexeme::Comma)) {
                    lexemes.next();
                } else {
                    break;
                }
            }
        }

        filters.push(call);
    }

    Ok(Expression {
        source: src.trim().to_string(),
        base,
        filters,
    })
}

/// Parse `a == b and c or d`; `and`/`or` group to the right
pub(crate) fn parse_condition(src: &str) -> Result<Condition, String> {
    let mut lexemes = Lexemes::new(src)?;
    if lexemes.is_done() {
        return Err("empty condition".to_string());
    }
    let condition = parse_condition_from(&mut lexemes)?;
    if !lexemes.is_done() {
        return Err(format!("unexpected {:?} in condition '{}'", lexemes.peek(), src));
    }
    Ok(condition)
}

fn parse_condition_from(lexemes: &mut Lexemes) -> Result<Condition, String> {
    let left = lexemes.operand()?;
    let op = match lexemes.peek() {
        Some(Lexeme::Op(op)) => Some(*op),
        Some(Lexeme::Word(w)) if w == "contains" => Some(CompareOp::Contains),
        _ => None,
    };

    let comparison = match op {
        Some(op) => {
            lexemes.next();
            Condition::Compare {
                left,
                op,
                right: lexemes.operand()?,
            }
        }
        None => Condition::Truthy(left),
    };

    if lexemes.eat_word("and") {
        Ok(Condition::And(
            Box::new(comparison),
            Box::new(parse_condition_from(lexemes)?),
        ))
    } else if lexemes.eat_word("or") {
        Ok(Condition::Or(
            Box::new(comparison),
            Box::new(parse_condition_from(lexemes)?),
        ))
    } else {
        Ok(comparison)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lex_filter_pipeline() {
        let lexemes = lex("image | image_tag: alt: 'A hat', width: 300").unwrap();
        assert_eq!(
            lexemes,
            vec![
                Lexeme::Word("image".into()),
                Lexeme::Pipe,
                Lexeme::Word("image_tag".into()),
                Lexeme::Colon,
                Lexeme::Word("alt".into()),
                Lexeme::Colon,
                Lexeme::Str("A hat".into()),
                Lexeme::Comma,
                Lexeme::Word("width".into()),
                Lexeme::Colon,
                Lexeme::Num(json!(300)),
            ]
        );
    }

    #[test]
    fn test_lex_rejects_unterminated_string() {
        assert!(lex("'open").is_err());
    }

    #[test]
    fn test_parse_path_segments() {
        let path = parse_path(r#"collection.products[0]["sale price"]"#).unwrap();
        assert_eq!(path.root, "collection");
        assert_eq!(
            path.segments,
            vec![
                Segment::Key("products".into()),
                Segment::Index(0),
                Segment::Key("sale price".into()),
            ]
        );
    }

    #[test]
    fn test_parse_expression_with_positional_and_keyword_args() {
        let expr = parse_expression("product.image | img_url: '100x100' | image_tag: class: 'thumb'")
            .unwrap();
        assert_eq!(expr.filters.len(), 2);
        assert_eq!(expr.filters[0].name, "img_url");
        assert_eq!(
            expr.filters[0].args,
            vec![Operand::Literal(json!("100x100"))]
        );
        assert_eq!(expr.filters[1].kwargs[0].0, "class");
    }

    #[test]
    fn test_parse_expression_literal_base() {
        let expr = parse_expression("'sale' | upcase").unwrap();
        assert_eq!(expr.base, Operand::Literal(json!("sale")));
    }

    #[test]
    fn test_parse_condition_groups_right() {
        let condition = parse_condition("a or b and c").unwrap();
        match condition {
            Condition::Or(left, right) => {
                assert!(matches!(*left, Condition::Truthy(_)));
                assert!(matches!(*right, Condition::And(_, _)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_condition_comparison_operators() {
        for (src, op) in [
            ("a == 1", CompareOp::Eq),
            ("a != 1", CompareOp::Ne),
            ("a < 1", CompareOp::Lt),
            ("a <= 1", CompareOp::Le),
            ("a > 1", CompareOp::Gt),
            ("a >= 1", CompareOp::Ge),
            ("tags contains 'sale'", CompareOp::Contains),
        ] {
            match parse_condition(src).unwrap() {
                Condition::Compare { op: parsed, .. } => assert_eq!(parsed, op, "{}", src),
                other => panic!("unexpected {:?} for {}", other, src),
            }
        }
    }

    #[test]
    fn test_negative_numbers_and_dashed_words() {
        assert_eq!(lex("-5").unwrap(), vec![Lexeme::Num(json!(-5))]);
        assert_eq!(
            lex("hero-image").unwrap(),
            vec![Lexeme::Word("hero-image".into())]
        );
    }
}

//! Block parsing: turns the token stream into a node tree
//!
//! Block tags (`if`, `unless`, `for`) nest; `raw` and `comment` swallow
//! everything up to their closing tag without interpreting it.

use super::expr::{parse_condition, parse_expression, Condition, Expression, Lexeme, Lexemes, Operand};
use super::tokenize::{find_end_tag, Delimiter, Token, TokenKind, TokenStream};
use crate::template::error::TemplateError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Output {
        expr: Expression,
        line: usize,
    },
    If {
        /// `if` and `elsif` arms, in order
        branches: Vec<(Condition, Vec<Node>)>,
        otherwise: Vec<Node>,
        line: usize,
    },
    Unless {
        condition: Condition,
        body: Vec<Node>,
        otherwise: Vec<Node>,
        line: usize,
    },
    For(ForLoop),
    Assign {
        name: String,
        expr: Expression,
        line: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ForLoop {
    pub var: String,
    pub subject: Operand,
    pub limit: Option<Operand>,
    pub offset: Option<Operand>,
    pub reversed: bool,
    pub body: Vec<Node>,
    /// Rendered when the subject has no items
    pub otherwise: Vec<Node>,
    pub line: usize,
}

/// Text between tokens or a token, with whitespace control already applied
enum Item {
    Text { start: usize, end: usize },
    Token(Token),
}

fn malformed(message: impl Into<String>, line: usize) -> TemplateError {
    TemplateError::MalformedSyntax {
        message: message.into(),
        line,
    }
}

/// Closing tag of a block whose body is not tokenized
fn verbatim_end(kind: &TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Tag { name, .. } if name == "raw" => Some("endraw"),
        TokenKind::Tag { name, .. } if name == "comment" => Some("endcomment"),
        _ => None,
    }
}

/// Split the template into text spans and tokens, honouring `{{-` / `-}}`
///
/// `raw` and `comment` bodies are passed over untokenized; the body is
/// sliced from the template by the parser.
fn items(template: &str) -> Vec<Item> {
    let mut items = Vec::new();
    let mut cursor = 0;
    let mut trim_next = false;
    let mut stream = TokenStream::new(template);

    while let Some(token) = stream.next() {
        let mut end = token.start;
        let mut start = cursor;
        if trim_next {
            start = end - template[start..end].trim_start().len();
        }
        if token.trim_left {
            end = start + template[start..end].trim_end().len();
        }
        if start < end {
            items.push(Item::Text { start, end });
        }
        cursor = token.end();
        trim_next = token.trim_right;
        if let Some(end) = verbatim_end(&token.kind).and_then(|name| find_end_tag(template, cursor, name)) {
            stream.skip_to(end);
            cursor = end;
            trim_next = false;
        }
        items.push(Item::Token(token));
    }

    let mut start = cursor;
    if trim_next {
        start = template.len() - template[start..].trim_start().len();
    }
    if start < template.len() {
        items.push(Item::Text {
            start,
            end: template.len(),
        });
    }

    items
}

/// Parse a template into nodes
pub(crate) fn parse(template: &str) -> Result<Vec<Node>, TemplateError> {
    let mut parser = Parser {
        template,
        items: items(template),
        pos: 0,
    };
    let (nodes, terminator) = parser.parse_until(&[])?;
    if let Some(end) = terminator {
        return Err(malformed(
            format!("Unexpected {{% {} %}} without matching block", end.name),
            end.line,
        ));
    }
    Ok(nodes)
}

/// Closing or intermediate tag that ended a nested parse
struct Terminator {
    name: String,
    args: String,
    line: usize,
}

struct Parser<'a> {
    template: &'a str,
    items: Vec<Item>,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Parse nodes until one of `terminators` (or end of input)
    fn parse_until(
        &mut self,
        terminators: &[&str],
    ) -> Result<(Vec<Node>, Option<Terminator>), TemplateError> {
        let mut nodes = Vec::new();

        while self.pos < self.items.len() {
            let index = self.pos;
            self.pos += 1;

            let token = match &self.items[index] {
                Item::Text { start, end } => {
                    nodes.push(Node::Text(self.template[*start..*end].to_string()));
                    continue;
                }
                Item::Token(token) => token.clone(),
            };

            let line = token.line;
            let token_end = token.end();

            match token.kind {
                TokenKind::Unclosed { delimiter } => {
                    let what = match delimiter {
                        Delimiter::Output => "Unclosed output tag '{{'",
                        Delimiter::Tag => "Unclosed tag '{%'",
                    };
                    return Err(malformed(what, line));
                }
                TokenKind::Output { expr } => {
                    let expr = parse_expression(&expr).map_err(|m| malformed(m, line))?;
                    nodes.push(Node::Output { expr, line });
                }
                TokenKind::Tag { name, args } => {
                    if terminators.contains(&name.as_str()) {
                        return Ok((
                            nodes,
                            Some(Terminator { name, args, line }),
                        ));
                    }
                    if let Some(node) = self.parse_tag(&name, &args, line, token_end)? {
                        nodes.push(node);
                    }
                }
            }
        }

        Ok((nodes, None))
    }

    fn expect_end(
        &mut self,
        terminators: &[&str],
        opener: &str,
        line: usize,
    ) -> Result<(Vec<Node>, Terminator), TemplateError> {
        match self.parse_until(terminators)? {
            (nodes, Some(end)) => Ok((nodes, end)),
            (_, None) => Err(malformed(format!("Unclosed {{% {} %}} block", opener), line)),
        }
    }

    /// `token_end` is the byte offset just past the tag itself
    fn parse_tag(
        &mut self,
        name: &str,
        args: &str,
        line: usize,
        token_end: usize,
    ) -> Result<Option<Node>, TemplateError> {
        match name {
            "if" => self.parse_if(args, line).map(Some),
            "unless" => self.parse_unless(args, line).map(Some),
            "for" => self.parse_for(args, line).map(Some),
            "assign" => parse_assign(args, line).map(Some),
            "raw" => {
                let end = self.skip_to("endraw", "raw", line)?;
                Ok(Some(Node::Text(self.template[token_end..end].to_string())))
            }
            "comment" => {
                self.skip_to("endcomment", "comment", line)?;
                Ok(None)
            }
            "elsif" | "else" | "endif" | "endunless" | "endfor" | "endraw" | "endcomment" => {
                Err(malformed(
                    format!("Unexpected {{% {} %}} without matching block", name),
                    line,
                ))
            }
            _ => Err(TemplateError::UnknownTag {
                name: name.to_string(),
                line,
            }),
        }
    }

    /// Skip raw items up to the closing tag; returns the closing tag's start offset
    fn skip_to(&mut self, end_name: &str, opener: &str, line: usize) -> Result<usize, TemplateError> {
        while self.pos < self.items.len() {
            let index = self.pos;
            self.pos += 1;
            if let Item::Token(Token {
                kind: TokenKind::Tag { name, .. },
                start,
                ..
            }) = &self.items[index]
            {
                if name == end_name {
                    return Ok(*start);
                }
            }
        }
        Err(malformed(format!("Unclosed {{% {} %}} block", opener), line))
    }

    fn parse_if(&mut self, args: &str, line: usize) -> Result<Node, TemplateError> {
        let mut branches = Vec::new();
        let mut condition = parse_condition(args).map_err(|m| malformed(m, line))?;

        loop {
            let (body, end) = self.expect_end(&["elsif", "else", "endif"], "if", line)?;
            branches.push((condition, body));
            match end.name.as_str() {
                "elsif" => {
                    condition = parse_condition(&end.args).map_err(|m| malformed(m, end.line))?;
                }
                "else" => {
                    let (otherwise, _) = self.expect_end(&["endif"], "if", line)?;
                    return Ok(Node::If {
                        branches,
                        otherwise,
                        line,
                    });
                }
                _ => {
                    return Ok(Node::If {
                        branches,
                        otherwise: Vec::new(),
                        line,
                    })
                }
            }
        }
    }

    fn parse_unless(&mut self, args: &str, line: usize) -> Result<Node, TemplateError> {
        let condition = parse_condition(args).map_err(|m| malformed(m, line))?;
        let (body, end) = self.expect_end(&["else", "endunless"], "unless", line)?;
        let otherwise = if end.name == "else" {
            self.expect_end(&["endunless"], "unless", line)?.0
        } else {
            Vec::new()
        };
        Ok(Node::Unless {
            condition,
            body,
            otherwise,
            line,
        })
    }

    fn parse_for(&mut self, args: &str, line: usize) -> Result<Node, TemplateError> {
        let header = parse_for_header(args).map_err(|m| malformed(m, line))?;
        let (body, end) = self.expect_end(&["else", "endfor"], "for", line)?;
        let otherwise = if end.name == "else" {
            self.expect_end(&["endfor"], "for", line)?.0
        } else {
            Vec::new()
        };
        Ok(Node::For(ForLoop {
            body,
            otherwise,
            line,
            ..header
        }))
    }
}

/// `item in collection.products limit: 4 offset: 1 reversed`
fn parse_for_header(args: &str) -> Result<ForLoop, String> {
    let mut lexemes = Lexemes::new(args)?;
    let var = match lexemes.next() {
        Some(Lexeme::Word(w)) if !w.contains(['.', '[']) => w,
        _ => return Err(format!("Invalid for syntax: expected 'item in list' in 'for {}'", args)),
    };
    if !lexemes.eat_word("in") {
        return Err(format!("Invalid for syntax: missing 'in' in 'for {}'", args));
    }
    let subject = lexemes.operand()?;

    let mut header = ForLoop {
        var,
        subject,
        limit: None,
        offset: None,
        reversed: false,
        body: Vec::new(),
        otherwise: Vec::new(),
        line: 0,
    };

    while let Some(lexeme) = lexemes.next() {
        match lexeme {
            Lexeme::Word(w) if w == "reversed" => header.reversed = true,
            Lexeme::Word(w) if w == "limit" || w == "offset" => {
                if lexemes.next() != Some(Lexeme::Colon) {
                    return Err(format!("expected ':' after '{}'", w));
                }
                let value = lexemes.operand()?;
                if w == "limit" {
                    header.limit = Some(value);
                } else {
                    header.offset = Some(value);
                }
            }
            Lexeme::Comma => {}
            other => return Err(format!("unexpected {:?} in 'for {}'", other, args)),
        }
    }

    Ok(header)
}

/// `name = expression`
fn parse_assign(args: &str, line: usize) -> Result<Node, TemplateError> {
    let (name, expr) = args
        .split_once('=')
        .ok_or_else(|| malformed(format!("Invalid assign syntax: 'assign {}'", args), line))?;
    let name = name.trim();
    let valid_name = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid_name {
        return Err(malformed(format!("Invalid assign target '{}'", name), line));
    }
    let expr = parse_expression(expr).map_err(|m| malformed(m, line))?;
    Ok(Node::Assign {
        name: name.to_string(),
        expr,
        line,
    })
}

//! Tokenization for template engine
//!
//! Provides O(n) tokenization using a state machine.

/// Which delimiter pair opened a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delimiter {
    /// `{{ ... }}`
    Output,
    /// `{% ... %}`
    Tag,
}

impl Delimiter {
    /// First byte of the closing pair (`}` or `%`); the second is always `}`
    fn close_byte(self) -> u8 {
        match self {
            Delimiter::Output => b'}',
            Delimiter::Tag => b'%',
        }
    }
}

/// Token classification
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// `{{ expr }}`
    Output { expr: String },

    /// `{% name args %}`
    Tag { name: String, args: String },

    /// `{{` or `{%` without a closing pair before end of input
    Unclosed { delimiter: Delimiter },
}

/// A single `{{...}}` or `{%...%}` token with position and classification
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    /// Token classification
    pub kind: TokenKind,
    /// Absolute byte position of the opening delimiter
    pub start: usize,
    /// Total length in bytes including both delimiters
    pub length: usize,
    /// `{{-` / `{%-`: strip whitespace before the token
    pub trim_left: bool,
    /// `-}}` / `-%}`: strip whitespace after the token
    pub trim_right: bool,
    /// Line number where token starts (for error messages)
    pub line: usize,
}

impl Token {
    /// Byte position just past the closing delimiter
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Tokenization state machine
///
/// ```text
/// Normal ──{───> SeenLBrace ──{ or %──> InToken ──} or %──> SeenClose ──}───> [Yield Token] → Normal
///   │               │                      │  ▲                 │
///   │ (not {)       │ (other)              │  └─ quote ─┐       │ (not })
///   └──────────────>└─────────────────────>└────────────┘<──────┘
///
/// EOF inside a token → one Unclosed token, then end of stream
/// ```
///
/// Quoted strings inside a token are skipped, so `{{ "}}" }}` is one token.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScanState {
    /// Scanning regular text
    Normal,

    /// Seen `{`, checking for a second `{` or `%`
    SeenLBrace {
        /// Position of the `{` character
        pos: usize,
        /// Line of the `{` character
        line: usize,
    },

    /// Inside a token, scanning for the closing pair
    InToken {
        /// Byte position of the opening delimiter
        start: usize,
        /// Byte position where token content starts
        content_start: usize,
        /// Opening delimiter
        delimiter: Delimiter,
        /// Quote byte while inside a string literal
        quote: Option<u8>,
        /// Line where the token started
        line: usize,
    },

    /// Seen the first byte of the closing pair
    SeenClose {
        start: usize,
        content_start: usize,
        delimiter: Delimiter,
        /// Position of the first closing byte
        close_pos: usize,
        line: usize,
    },

    /// Input exhausted
    Done,
}

/// Iterator over tokens in a template string
///
/// Each byte is visited once; positions never move backward.
pub(crate) struct TokenStream<'a> {
    /// Zero-copy byte slice of template text
    bytes: &'a [u8],
    /// Current byte position
    pos: usize,
    /// State machine state
    state: ScanState,
    /// Current line number (for error messages)
    line: usize,
}

impl<'a> TokenStream<'a> {
    /// Create a new TokenStream from template text
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
            state: ScanState::Normal,
            line: 1,
        }
    }

    /// Build a token from the content between the delimiters
    fn classify(&self, delimiter: Delimiter, content: &str) -> (TokenKind, bool, bool) {
        let (content, trim_left) = match content.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (content, false),
        };
        let (content, trim_right) = match content.strip_suffix('-') {
            Some(rest) => (rest, true),
            None => (content, false),
        };
        let content = content.trim();

        let kind = match delimiter {
            Delimiter::Output => TokenKind::Output {
                expr: content.to_string(),
            },
            Delimiter::Tag => {
                let (name, args) = match content.find(char::is_whitespace) {
                    Some(split) => (&content[..split], content[split..].trim()),
                    None => (content, ""),
                };
                TokenKind::Tag {
                    name: name.to_string(),
                    args: args.to_string(),
                }
            }
        };

        (kind, trim_left, trim_right)
    }

    /// Jump ahead to `pos` in Normal state, keeping the line count in step
    pub fn skip_to(&mut self, pos: usize) {
        let pos = pos.min(self.bytes.len());
        while self.pos < pos {
            self.advance(self.bytes[self.pos]);
        }
        self.state = ScanState::Normal;
    }

    fn advance(&mut self, byte: u8) {
        if byte == b'\n' {
            self.line += 1;
        }
        self.pos += 1;
    }

    /// Emit the Unclosed token for a token still open at end of input
    fn finish(&mut self) -> Option<Token> {
        let state = std::mem::replace(&mut self.state, ScanState::Done);
        match state {
            ScanState::InToken {
                start,
                delimiter,
                line,
                ..
            }
            | ScanState::SeenClose {
                start,
                delimiter,
                line,
                ..
            } => Some(Token {
                kind: TokenKind::Unclosed { delimiter },
                start,
                length: self.bytes.len() - start,
                trim_left: false,
                trim_right: false,
                line,
            }),
            _ => None,
        }
    }
}

/// Byte offset of the first `{% name %}` at or after `from`, with or without
/// trim markers
///
/// Scans plain text, so quotes in between do not matter.
pub(crate) fn find_end_tag(text: &str, from: usize, name: &str) -> Option<usize> {
    let mut search = from;
    while let Some(offset) = text.get(search..)?.find("{%") {
        let start = search + offset;
        let rest = &text[start + 2..];
        let rest = rest.strip_prefix('-').unwrap_or(rest).trim_start();
        if let Some(after) = rest.strip_prefix(name) {
            let after = after.trim_start();
            if after.strip_prefix('-').unwrap_or(after).starts_with("%}") {
                return Some(start);
            }
        }
        search = start + 2;
    }
    None
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.state == ScanState::Done {
                return None;
            }
            if self.pos >= self.bytes.len() {
                return self.finish();
            }

            let byte = self.bytes[self.pos];

            match self.state.clone() {
                ScanState::Normal => {
                    if byte == b'{' {
                        self.state = ScanState::SeenLBrace {
                            pos: self.pos,
                            line: self.line,
                        };
                    }
                    self.advance(byte);
                }
                ScanState::SeenLBrace { pos, line } => {
                    let delimiter = match byte {
                        b'{' => Some(Delimiter::Output),
                        b'%' => Some(Delimiter::Tag),
                        _ => None,
                    };
                    match delimiter {
                        Some(delimiter) => {
                            self.state = ScanState::InToken {
                                start: pos,
                                content_start: self.pos + 1,
                                delimiter,
                                quote: None,
                                line,
                            };
                            self.advance(byte);
                        }
                        // Reprocess this byte in Normal state
                        None => self.state = ScanState::Normal,
                    }
                }
                ScanState::InToken {
                    start,
                    content_start,
                    delimiter,
                    quote,
                    line,
                } => {
                    match quote {
                        Some(q) if byte == q => {
                            self.state = ScanState::InToken {
                                start,
                                content_start,
                                delimiter,
                                quote: None,
                                line,
                            };
                        }
                        Some(_) => {}
                        None if byte == b'"' || byte == b'\'' => {
                            self.state = ScanState::InToken {
                                start,
                                content_start,
                                delimiter,
                                quote: Some(byte),
                                line,
                            };
                        }
                        None if byte == delimiter.close_byte() => {
                            self.state = ScanState::SeenClose {
                                start,
                                content_start,
                                delimiter,
                                close_pos: self.pos,
                                line,
                            };
                        }
                        None => {}
                    }
                    self.advance(byte);
                }
                ScanState::SeenClose {
                    start,
                    content_start,
                    delimiter,
                    close_pos,
                    line,
                } => {
                    if byte == b'}' {
                        let content = std::str::from_utf8(&self.bytes[content_start..close_pos])
                            .unwrap_or("");
                        let (kind, trim_left, trim_right) = self.classify(delimiter, content);
                        self.advance(byte);
                        self.state = ScanState::Normal;
                        return Some(Token {
                            kind,
                            start,
                            length: self.pos - start,
                            trim_left,
                            trim_right,
                            line,
                        });
                    }
                    // Not a closing pair, reprocess this byte inside the token
                    self.state = ScanState::InToken {
                        start,
                        content_start,
                        delimiter,
                        quote: None,
                        line,
                    };
                }
                ScanState::Done => return None,
            }
        }
    }
}

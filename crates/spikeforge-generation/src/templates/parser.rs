//! Template syntax parser
//!
//! Parses template text into an element tree, rejecting malformed syntax
//! with the line it occurs on. Parsing is independent of parameter values;
//! the engine walks the tree with a resolved scope afterwards.

use crate::error::RenderError;

/// One parsed template element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateElement {
    /// Plain text, emitted verbatim
    Text(String),
    /// `{{name}}`
    Placeholder(String),
    /// `{{#if name}}...{{/if}}` or `{{#unless name}}...{{/unless}}`
    Conditional {
        /// Parameter the block tests
        var: String,
        /// True for the `unless` inverse form
        negated: bool,
        /// Elements inside the block
        body: Vec<TemplateElement>,
    },
    /// `{{#each name}}...{{/each}}`
    Loop {
        /// List parameter iterated over
        var: String,
        /// Elements rendered once per item, with `this` bound
        body: Vec<TemplateElement>,
    },
}

/// A parsed template
#[derive(Debug, Clone)]
pub struct ParsedTemplate {
    /// Top-level elements in source order
    pub elements: Vec<TemplateElement>,
}

/// Entry point for template parsing
pub struct TemplateParser;

impl TemplateParser {
    /// Parse template text into an element tree
    pub fn parse(content: &str) -> Result<ParsedTemplate, RenderError> {
        let mut parser = Parser {
            src: content,
            pos: 0,
            line: 1,
        };
        let elements = parser.parse_elements(None)?;
        Ok(ParsedTemplate { elements })
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn advance(&mut self, n: usize) {
        let consumed = &self.src[self.pos..self.pos + n];
        self.line += consumed.matches('\n').count();
        self.pos += n;
    }

    fn syntax(&self, message: impl Into<String>) -> RenderError {
        RenderError::Syntax {
            line: self.line,
            message: message.into(),
        }
    }

    /// Parse elements until the closing tag (or end of input at top level)
    fn parse_elements(
        &mut self,
        terminator: Option<&str>,
    ) -> Result<Vec<TemplateElement>, RenderError> {
        let mut elements = Vec::new();

        loop {
            if let Some(term) = terminator {
                if self.rest().starts_with(term) {
                    self.advance(term.len());
                    return Ok(elements);
                }
            }

            if self.rest().is_empty() {
                return match terminator {
                    None => Ok(elements),
                    Some(term) => Err(self.syntax(format!("unclosed block, expected '{term}'"))),
                };
            }

            if self.rest().starts_with("{{") {
                elements.push(self.parse_tag()?);
            } else {
                elements.push(TemplateElement::Text(self.parse_text()));
            }
        }
    }

    fn parse_text(&mut self) -> String {
        let rest = self.rest();
        let end = rest.find("{{").unwrap_or(rest.len());
        let text = rest[..end].to_string();
        self.advance(end);
        text
    }

    fn parse_tag(&mut self) -> Result<TemplateElement, RenderError> {
        self.advance(2); // {{

        let rest = self.rest();
        if let Some(block) = rest.strip_prefix('#') {
            let word_len = block
                .find(|c: char| c.is_whitespace() || c == '}')
                .unwrap_or(block.len());
            let keyword = &block[..word_len];
            match keyword {
                "if" => {
                    self.parse_block(1 + word_len, "{{/if}}")
                        .map(|(var, body)| TemplateElement::Conditional {
                            var,
                            negated: false,
                            body,
                        })
                }
                "unless" => {
                    self.parse_block(1 + word_len, "{{/unless}}")
                        .map(|(var, body)| TemplateElement::Conditional {
                            var,
                            negated: true,
                            body,
                        })
                }
                "each" => self
                    .parse_block(1 + word_len, "{{/each}}")
                    .map(|(var, body)| TemplateElement::Loop { var, body }),
                other => Err(self.syntax(format!("unknown block type '{other}'"))),
            }
        } else if rest.starts_with('/') {
            Err(self.syntax("unexpected closing tag"))
        } else {
            let var = self.read_tag_body()?;
            Ok(TemplateElement::Placeholder(var))
        }
    }

    /// Parse `<skip><var>}}<body><terminator>` into (var, body)
    fn parse_block(
        &mut self,
        skip: usize,
        terminator: &str,
    ) -> Result<(String, Vec<TemplateElement>), RenderError> {
        self.advance(skip);
        let var = self.read_tag_body()?;
        let body = self.parse_elements(Some(terminator))?;
        Ok((var, body))
    }

    /// Read up to `}}`, returning the trimmed tag body
    fn read_tag_body(&mut self) -> Result<String, RenderError> {
        let rest = self.rest();
        let Some(end) = rest.find("}}") else {
            return Err(self.syntax("unterminated tag, expected '}}'"));
        };
        let body = rest[..end].trim().to_string();
        self.advance(end + 2);

        if body.is_empty() {
            return Err(self.syntax("empty tag"));
        }
        if body.contains("{{") || body.contains(char::is_whitespace) {
            return Err(self.syntax(format!("malformed tag '{body}'")));
        }
        Ok(body)
    }
}

//! Text signature parser
//!
//! Recursive-descent parser for the `N.txt` form of a platform API
//! description:
//!
//! ```text
//! package android.view {
//!   public class View extends java.lang.Object implements android.graphics.drawable.Drawable.Callback {
//!     ctor public View(android.content.Context);
//!     method public void draw(android.graphics.Canvas);
//!     field public static final int NO_ID = -1; // 0xffffffff
//!   }
//! }
//! ```

use r_droid_apigen_core::{ApiGenError, Result};
use tracing::debug;

use crate::state::{MethodBuilder, SignatureSink};
use crate::tokenizer::{is_identifier, ParenMode, Tokenizer};

/// Modifiers accepted in front of declarations
const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "deprecated",
    "synchronized",
    "transient",
    "volatile",
    "native",
];

/// Text signature file parser
pub struct TextApiParser;

impl TextApiParser {
    /// Parse one text signature file, reporting declarations to `sink`
    pub fn parse<S>(file: &str, text: &str, sink: &mut S) -> Result<()>
    where
        S: SignatureSink + ?Sized,
    {
        let mut parser = Parser {
            tokenizer: Tokenizer::new(file, text),
            sink,
        };
        parser.parse_file()?;
        debug!("Parsed {} ({} lines)", file, parser.tokenizer.line());
        Ok(())
    }
}

struct Parser<'a, 's, S: ?Sized> {
    tokenizer: Tokenizer<'a>,
    sink: &'s mut S,
}

impl<'a, S: SignatureSink + ?Sized> Parser<'a, '_, S> {
    fn parse_file(&mut self) -> Result<()> {
        while let Some(token) = self.tokenizer.next_token()? {
            if token != "package" {
                return Err(self.error(format!("expected package got {}", token)));
            }
            self.parse_package()?;
        }
        self.sink.done();
        Ok(())
    }

    fn parse_package(&mut self) -> Result<()> {
        let name = self.require_identifier()?;
        self.sink.add_package(name).map_err(|e| self.locate(e))?;

        let token = self.tokenizer.require_token()?;
        if token != "{" {
            return Err(self.error(format!("expected '{{' got {}", token)));
        }

        loop {
            let token = self.tokenizer.require_token()?;
            if token == "}" {
                break;
            }
            self.parse_class(token)?;
        }

        self.sink.finish_package();
        Ok(())
    }

    fn parse_class(&mut self, token: &'a str) -> Result<()> {
        let token = self.skip_modifiers(token)?;
        if token != "class" && token != "interface" {
            return Err(self.error(format!("missing class or interface. got: {}", token)));
        }

        let name = self.require_identifier()?;
        self.sink.add_class(name).map_err(|e| self.locate(e))?;

        let mut token = self.tokenizer.require_token()?;
        if token == "extends" {
            let super_class = self.require_identifier()?;
            self.sink
                .add_super_class(super_class)
                .map_err(|e| self.locate(e))?;
            token = self.tokenizer.require_token()?;
        }

        if token == "implements" {
            loop {
                token = self.tokenizer.require_token()?;
                if token == "{" {
                    break;
                }
                if token != "," {
                    self.expect_identifier(token)?;
                    self.sink.add_interface(token).map_err(|e| self.locate(e))?;
                }
            }
        }

        if token != "{" {
            return Err(self.error(format!("expected '{{' got {}", token)));
        }

        loop {
            let token = self.tokenizer.require_token()?;
            match token {
                "}" => break,
                "ctor" => self.parse_constructor()?,
                "method" => self.parse_method()?,
                "field" | "enum_constant" => self.parse_field()?,
                other => {
                    return Err(self.error(format!(
                        "expected ctor, enum_constant, field or method got {}",
                        other
                    )))
                }
            }
        }

        self.sink.finish_class();
        Ok(())
    }

    fn parse_constructor(&mut self) -> Result<()> {
        let token = self.tokenizer.require_token()?;
        let token = self.skip_modifiers(token)?;
        let token = self.skip_type_parameters(token)?;
        self.expect_identifier(token)?;
        self.expect("(")?;

        let mut method = self.sink.start_new_constructor();
        self.parse_parameters(&mut method)?;
        self.parse_member_end()?;
        self.sink.finish_method(method).map_err(|e| self.locate(e))
    }

    fn parse_method(&mut self) -> Result<()> {
        let token = self.tokenizer.require_token()?;
        let token = self.skip_modifiers(token)?;
        let return_type = self.skip_type_parameters(token)?;
        self.expect_identifier(return_type)?;
        let name = self.require_identifier()?;
        self.expect("(")?;

        let mut method = self.sink.start_new_method(name, Some(return_type));
        self.parse_parameters(&mut method)?;
        self.parse_member_end()?;
        self.sink.finish_method(method).map_err(|e| self.locate(e))
    }

    fn parse_field(&mut self) -> Result<()> {
        let token = self.tokenizer.require_token()?;
        let field_type = self.skip_modifiers(token)?;
        self.expect_identifier(field_type)?;
        let name = self.require_identifier()?;

        let mut value = None;
        let mut token = self.tokenizer.require_token()?;
        if token == "=" {
            value = Some(self.tokenizer.require_token_with(ParenMode::Identifier)?);
            token = self.tokenizer.require_token()?;
        }
        if token != ";" {
            return Err(self.error(format!("expected ; found {}", token)));
        }

        self.sink.add_field(name, value).map_err(|e| self.locate(e))
    }

    /// Parameter list after the opening parenthesis, through the closing one
    fn parse_parameters(&mut self, method: &mut MethodBuilder) -> Result<()> {
        let mut token = self.tokenizer.require_token()?;
        loop {
            if token == ")" {
                return Ok(());
            }

            self.expect_identifier(token)?;
            let type_name = token;

            token = self.tokenizer.require_token()?;
            if is_identifier(token) {
                // parameter name
                token = self.tokenizer.require_token()?;
            }

            if token == "," {
                token = self.tokenizer.require_token()?;
            } else if token != ")" {
                return Err(self.error(format!("expected , found {}", token)));
            }

            method.add_method_parameter(type_name);
        }
    }

    /// Optional `throws` clause and the terminating `;`
    fn parse_member_end(&mut self) -> Result<()> {
        let mut token = self.tokenizer.require_token()?;
        if token == "throws" {
            token = self.parse_throws()?;
        }
        if token != ";" {
            return Err(self.error(format!("expected ; found {}", token)));
        }
        Ok(())
    }

    /// Exception list; returns the token that ended it
    fn parse_throws(&mut self) -> Result<&'a str> {
        let mut token = self.tokenizer.require_token()?;
        let mut after_comma = true;

        loop {
            if token == ";" {
                return Ok(token);
            } else if token == "," {
                if after_comma {
                    return Err(self.error("Expected exception, got ','"));
                }
                after_comma = true;
            } else {
                if !after_comma {
                    return Err(self.error(format!("Expected ',' or ';' got {}", token)));
                }
                after_comma = false;
            }
            token = self.tokenizer.require_token()?;
        }
    }

    fn skip_modifiers(&mut self, mut token: &'a str) -> Result<&'a str> {
        while MODIFIERS.contains(&token) {
            token = self.tokenizer.require_token()?;
        }
        Ok(token)
    }

    /// Skip a generic method's `<T extends ...>` prefix
    fn skip_type_parameters(&mut self, mut token: &'a str) -> Result<&'a str> {
        if token != "<" {
            return Ok(token);
        }

        let mut depth = 1usize;
        while depth > 0 {
            token = self.tokenizer.require_token()?;
            match token {
                "<" => depth += 1,
                ">" => depth -= 1,
                _ => {}
            }
        }
        Ok(self.tokenizer.require_token()?)
    }

    fn expect(&mut self, expected: &str) -> Result<()> {
        let token = self.tokenizer.require_token()?;
        if token != expected {
            return Err(self.error(format!("expected {} got {}", expected, token)));
        }
        Ok(())
    }

    fn require_identifier(&mut self) -> Result<&'a str> {
        let token = self.tokenizer.require_token()?;
        self.expect_identifier(token)?;
        Ok(token)
    }

    fn expect_identifier(&self, token: &str) -> Result<()> {
        if is_identifier(token) {
            Ok(())
        } else {
            Err(self.error(format!("Expected identifier: {}", token)))
        }
    }

    fn error(&self, message: impl Into<String>) -> ApiGenError {
        self.tokenizer.error(message).into()
    }

    /// Pin a sink error to the current position
    fn locate(&self, err: ApiGenError) -> ApiGenError {
        err.at_line(self.tokenizer.line())
            .in_file(self.tokenizer.file())
    }
}

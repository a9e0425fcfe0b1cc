/*!
Predictive (LL(1)) recognizer for KPL
=====================================

Every grammar nonterminal is one method on [`Parser`].  A method inspects the
lookahead held by the [`Cursor`], picks a production, and consumes terminals
through [`Cursor::expect`].  Nothing is built: recognizing a nonterminal either
returns `Ok(())` or the first [`Diagnostic`] encountered, which unwinds the
whole parse through `?`.

### Time & space

Each token is consumed once, so a parse is Θ(n) in the number of tokens.  The
only state is the two-token window plus the call stack, whose depth grows with
syntactic nesting.

### Logging Policy

| Location                       | Level   | Purpose                                 |
|--------------------------------|---------|-----------------------------------------|
| `Parser::new`, `parse`         | `info`  | Lifecycle milestones.                   |
| block, subroutine, statement   | `debug` | Rule entry/exit.                        |
| `Cursor::expect`               | `trace` | Every consumed token.                   |

Blocks, statements and expressions may nest at most `MAX_DEPTH` levels deep;
past that the parse fails with [`ErrorCategory::NestingTooDeep`] instead of
exhausting the thread's stack.

--------------------------------------------------------------------------------
Grammar (EBNF)
--------------

```text
program      → "program" IDENT ";" block "." EOF ;
block        → ( "const" constDecl+ )? ( "type" typeDecl+ )? ( "var" varDecl+ )?
               subDecl* "begin" statements "end" ;
constDecl    → IDENT "=" constant ";" ;
typeDecl     → IDENT "=" type ";" ;
varDecl      → IDENT ":" type ";" ;
subDecl      → "function" IDENT params ":" basicType ";" block ";"
             | "procedure" IDENT params ";" block ";" ;
params       → ( "(" param ( ";" param )* ")" )? ;
param        → IDENT ":" type ;
type         → IDENT | "array" "[" unsignedConst "]" "of" type | basicType ;
basicType    → "integer" | "char" ;
constant     → ( "+" | "-" )? unsignedConst ;
unsignedConst→ NUMBER | IDENT | CHAR_LITERAL ;
statements   → statement ( ";" statement )* ;
statement    → IDENT indexes ":=" expression
             | "call" IDENT arguments
             | "begin" statements "end"
             | "if" condition "then" statement ( "else" statement )?
             | "while" condition "do" statement
             | "for" IDENT ":=" expression "to" expression "do" statement
             | ε ;                       (lookahead in { ";", "end", "else" })
condition    → expression ( "=" | "<>" | "<" | "<=" | ">" | ">=" ) expression ;
expression   → ( "+" | "-" )? term ( ( "+" | "-" ) term )* ;
term         → factor ( ( "*" | "/" ) factor )* ;
factor       → NUMBER | CHAR_LITERAL | "(" expression ")"
             | IDENT indexes arguments ;
indexes      → ( "[" expression "]" )* ;
arguments    → ( "(" expression ( "," expression )* ")" )? ;
```

Two statements with no `;` between them are governed by [`SeparatorPolicy`].
*/

use crate::config::{ParserConfig, SeparatorPolicy};
use crate::cursor::{Cursor, TokenSource};
use crate::error::{Diagnostic, ErrorCategory, KplError, Result};
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Maximum number of nested blocks, statements and expressions.
const MAX_DEPTH: usize = 256;

/// Single-use syntax checker over a token source.
pub struct Parser<'a, S> {
    cursor: Cursor<'a, S>,
    config: ParserConfig,
    depth: usize,
}

impl<'a, S: TokenSource<'a>> Parser<'a, S> {
    /// Construct a new parser, priming the lookahead from `source`.
    pub fn new(source: S, config: ParserConfig) -> Result<Self> {
        info!("Parser created with {:?}", config);

        Ok(Self {
            cursor: Cursor::new(source)?,
            config,
            depth: 0,
        })
    }

    // ───────────────────────── public API ─────────────────────────

    /// Recognize a whole program, up to and including the end-of-file token.
    pub fn parse(mut self) -> Result<()> {
        info!("Beginning parse phase");

        self.program()?;
        self.cursor.expect(TokenType::EOF)?;

        info!("Program accepted");

        Ok(())
    }

    // ──────────────────────── declaration rules ───────────────────

    fn program(&mut self) -> Result<()> {
        debug!("Parsing a Program ....");

        self.cursor.expect(TokenType::PROGRAM)?;
        self.cursor.expect(TokenType::IDENTIFIER)?;
        self.cursor.expect(TokenType::SEMICOLON)?;
        self.block()?;
        self.cursor.expect(TokenType::PERIOD)?;

        debug!("Program parsed!");

        Ok(())
    }

    fn block(&mut self) -> Result<()> {
        self.descend()?;

        debug!("Parsing a Block ....");

        if self.cursor.check(TokenType::CONST) {
            self.cursor.expect(TokenType::CONST)?;
            self.declarations(Self::const_decl)?;
        }

        if self.cursor.check(TokenType::TYPE) {
            self.cursor.expect(TokenType::TYPE)?;
            self.declarations(Self::type_decl)?;
        }

        if self.cursor.check(TokenType::VAR) {
            self.cursor.expect(TokenType::VAR)?;
            self.declarations(Self::var_decl)?;
        }

        self.sub_decls()?;

        self.cursor.expect(TokenType::BEGIN)?;
        self.statements()?;
        self.cursor.expect(TokenType::END)?;

        debug!("Block parsed!");

        self.ascend();

        Ok(())
    }

    /// One or more `item ;` entries.  After each `;` the section goes on only
    /// while the lookahead is an identifier; anything else ends the section.
    fn declarations(&mut self, item: fn(&mut Self) -> Result<()>) -> Result<()> {
        loop {
            item(self)?;
            self.cursor.expect(TokenType::SEMICOLON)?;

            if !self.cursor.check(TokenType::IDENTIFIER) {
                return Ok(());
            }
        }
    }

    fn const_decl(&mut self) -> Result<()> {
        self.cursor.expect(TokenType::IDENTIFIER)?;
        self.cursor.expect(TokenType::EQUAL)?;
        self.constant()
    }

    fn type_decl(&mut self) -> Result<()> {
        self.cursor.expect(TokenType::IDENTIFIER)?;
        self.cursor.expect(TokenType::EQUAL)?;
        self.type_()
    }

    fn var_decl(&mut self) -> Result<()> {
        self.cursor.expect(TokenType::IDENTIFIER)?;
        self.cursor.expect(TokenType::COLON)?;
        self.type_()
    }

    fn sub_decls(&mut self) -> Result<()> {
        debug!("Parsing subroutines ....");

        loop {
            match self.lookahead() {
                TokenType::FUNCTION => self.func_decl()?,
                TokenType::PROCEDURE => self.proc_decl()?,
                _ => break,
            }
        }

        debug!("Subroutines parsed ....");

        Ok(())
    }

    fn func_decl(&mut self) -> Result<()> {
        debug!("Parsing a function ....");

        self.cursor.expect(TokenType::FUNCTION)?;
        self.cursor.expect(TokenType::IDENTIFIER)?;
        self.params()?;
        self.cursor.expect(TokenType::COLON)?;
        self.basic_type()?;
        self.cursor.expect(TokenType::SEMICOLON)?;
        self.block()?;
        self.cursor.expect(TokenType::SEMICOLON)?;

        debug!("Function parsed ....");

        Ok(())
    }

    fn proc_decl(&mut self) -> Result<()> {
        debug!("Parsing a procedure ....");

        self.cursor.expect(TokenType::PROCEDURE)?;
        self.cursor.expect(TokenType::IDENTIFIER)?;
        self.params()?;
        self.cursor.expect(TokenType::SEMICOLON)?;
        self.block()?;
        self.cursor.expect(TokenType::SEMICOLON)?;

        debug!("Procedure parsed ....");

        Ok(())
    }

    fn params(&mut self) -> Result<()> {
        if !self.cursor.check(TokenType::LEFT_PAREN) {
            return Ok(());
        }

        self.cursor.expect(TokenType::LEFT_PAREN)?;
        self.param()?;

        while self.cursor.check(TokenType::SEMICOLON) {
            self.cursor.expect(TokenType::SEMICOLON)?;
            self.param()?;
        }

        self.cursor.expect(TokenType::RIGHT_PAREN)?;

        Ok(())
    }

    fn param(&mut self) -> Result<()> {
        self.cursor.expect(TokenType::IDENTIFIER)?;
        self.cursor.expect(TokenType::COLON)?;
        self.type_()
    }

    // ─────────────────────── types & constants ────────────────────

    fn type_(&mut self) -> Result<()> {
        match self.lookahead() {
            TokenType::IDENTIFIER => {
                self.cursor.expect(TokenType::IDENTIFIER)?;
            }

            TokenType::ARRAY => {
                self.cursor.expect(TokenType::ARRAY)?;
                self.cursor.expect(TokenType::LEFT_BRACKET)?;
                self.unsigned_constant()?;
                self.cursor.expect(TokenType::RIGHT_BRACKET)?;
                self.cursor.expect(TokenType::OF)?;
                self.type_()?;
            }

            _ => self.basic_type()?,
        }

        Ok(())
    }

    fn basic_type(&mut self) -> Result<()> {
        match self.lookahead() {
            TokenType::INTEGER | TokenType::CHAR => {
                self.take()?;

                Ok(())
            }

            _ => Err(self.invalid(ErrorCategory::InvalidType)),
        }
    }

    fn constant(&mut self) -> Result<()> {
        if self.lookahead().is_additive() {
            self.take()?;
        }

        self.unsigned_constant()
    }

    fn unsigned_constant(&mut self) -> Result<()> {
        match self.lookahead() {
            TokenType::NUMBER | TokenType::IDENTIFIER | TokenType::CHAR_LITERAL => {
                self.take()?;

                Ok(())
            }

            _ => Err(self.invalid(ErrorCategory::InvalidConstant)),
        }
    }

    // ───────────────────────── statement rules ────────────────────

    fn statements(&mut self) -> Result<()> {
        self.statement()?;

        loop {
            let next: TokenType = self.lookahead();

            if next == TokenType::SEMICOLON {
                self.cursor.expect(TokenType::SEMICOLON)?;

                // A `;` before `end`/`else` closes the sequence with an empty statement.
                if self.lookahead().starts_statement() {
                    self.statement()?;
                }
            } else if next.starts_statement() {
                match self.config.separators {
                    SeparatorPolicy::Optional => self.statement()?,
                    SeparatorPolicy::Required => {
                        return Err(
                            Diagnostic::missing(TokenType::SEMICOLON, self.cursor.peek()).into(),
                        );
                    }
                }
            } else {
                return Ok(());
            }
        }
    }

    fn statement(&mut self) -> Result<()> {
        self.descend()?;

        match self.lookahead() {
            TokenType::IDENTIFIER => self.assign_st()?,
            TokenType::CALL => self.call_st()?,
            TokenType::BEGIN => self.group_st()?,
            TokenType::IF => self.if_st()?,
            TokenType::WHILE => self.while_st()?,
            TokenType::FOR => self.for_st()?,

            // Empty statement: only legal where its FOLLOW set begins.
            next if next.follows_statement() => {}

            _ => return Err(self.invalid(ErrorCategory::InvalidStatement)),
        }

        self.ascend();

        Ok(())
    }

    fn assign_st(&mut self) -> Result<()> {
        debug!("Parsing an assign statement ....");

        self.cursor.expect(TokenType::IDENTIFIER)?;
        self.indexes()?;
        self.cursor.expect(TokenType::ASSIGN)?;
        self.expression()?;

        debug!("Assign statement parsed ....");

        Ok(())
    }

    fn call_st(&mut self) -> Result<()> {
        debug!("Parsing a call statement ....");

        self.cursor.expect(TokenType::CALL)?;
        self.cursor.expect(TokenType::IDENTIFIER)?;
        self.arguments()?;

        debug!("Call statement parsed ....");

        Ok(())
    }

    fn group_st(&mut self) -> Result<()> {
        debug!("Parsing a group statement ....");

        self.cursor.expect(TokenType::BEGIN)?;
        self.statements()?;
        self.cursor.expect(TokenType::END)?;

        debug!("Group statement parsed ....");

        Ok(())
    }

    fn if_st(&mut self) -> Result<()> {
        debug!("Parsing an if statement ....");

        self.cursor.expect(TokenType::IF)?;
        self.condition()?;
        self.cursor.expect(TokenType::THEN)?;
        self.statement()?;

        if self.cursor.check(TokenType::ELSE) {
            self.cursor.expect(TokenType::ELSE)?;
            self.statement()?;
        }

        debug!("If statement parsed ....");

        Ok(())
    }

    fn while_st(&mut self) -> Result<()> {
        debug!("Parsing a while statement ....");

        self.cursor.expect(TokenType::WHILE)?;
        self.condition()?;
        self.cursor.expect(TokenType::DO)?;
        self.statement()?;

        debug!("While statement parsed ....");

        Ok(())
    }

    fn for_st(&mut self) -> Result<()> {
        debug!("Parsing a for statement ....");

        self.cursor.expect(TokenType::FOR)?;
        self.cursor.expect(TokenType::IDENTIFIER)?;
        self.cursor.expect(TokenType::ASSIGN)?;
        self.expression()?;
        self.cursor.expect(TokenType::TO)?;
        self.expression()?;
        self.cursor.expect(TokenType::DO)?;
        self.statement()?;

        debug!("For statement parsed ....");

        Ok(())
    }

    fn arguments(&mut self) -> Result<()> {
        if !self.cursor.check(TokenType::LEFT_PAREN) {
            return Ok(());
        }

        self.cursor.expect(TokenType::LEFT_PAREN)?;
        self.expression()?;

        while self.cursor.check(TokenType::COMMA) {
            self.cursor.expect(TokenType::COMMA)?;
            self.expression()?;
        }

        self.cursor.expect(TokenType::RIGHT_PAREN)?;

        Ok(())
    }

    fn condition(&mut self) -> Result<()> {
        self.expression()?;

        if !self.lookahead().is_comparator() {
            return Err(self.invalid(ErrorCategory::InvalidComparator));
        }

        self.take()?;
        self.expression()
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> Result<()> {
        self.descend()?;

        debug!("Parsing an expression");

        if self.lookahead().is_additive() {
            self.take()?;
        }

        self.term()?;

        while self.lookahead().is_additive() {
            self.take()?;
            self.term()?;
        }

        debug!("Expression parsed");

        self.ascend();

        Ok(())
    }

    fn term(&mut self) -> Result<()> {
        self.factor()?;

        while self.lookahead().is_multiplicative() {
            self.take()?;
            self.factor()?;
        }

        Ok(())
    }

    fn factor(&mut self) -> Result<()> {
        match self.lookahead() {
            TokenType::NUMBER | TokenType::CHAR_LITERAL => {
                self.take()?;
            }

            // variable, array element and function call share one shape
            TokenType::IDENTIFIER => {
                self.cursor.expect(TokenType::IDENTIFIER)?;
                self.indexes()?;
                self.arguments()?;
            }

            TokenType::LEFT_PAREN => {
                self.cursor.expect(TokenType::LEFT_PAREN)?;
                self.expression()?;
                self.cursor.expect(TokenType::RIGHT_PAREN)?;
            }

            _ => return Err(self.invalid(ErrorCategory::InvalidFactor)),
        }

        Ok(())
    }

    fn indexes(&mut self) -> Result<()> {
        while self.cursor.check(TokenType::LEFT_BRACKET) {
            self.cursor.expect(TokenType::LEFT_BRACKET)?;
            self.expression()?;
            self.cursor.expect(TokenType::RIGHT_BRACKET)?;
        }

        Ok(())
    }

    // ────────────────────── utility helpers ───────────────────────

    /// Enter a nested rule, failing at the lookahead once `MAX_DEPTH` is reached.
    /// An error ends the parse, so only successful rules call [`Self::ascend`].
    #[inline(always)]
    fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.invalid(ErrorCategory::NestingTooDeep));
        }

        self.depth += 1;

        Ok(())
    }

    #[inline(always)]
    fn ascend(&mut self) {
        self.depth -= 1;
    }

    /// Kind of the next unconsumed token.
    #[inline(always)]
    fn lookahead(&self) -> TokenType {
        self.cursor.peek().token_type
    }

    /// Consume whatever the lookahead is.  Only called after a branch has
    /// already matched on its kind.
    #[inline(always)]
    fn take(&mut self) -> Result<Token<'a>> {
        let token_type: TokenType = self.lookahead();

        self.cursor.expect(token_type)
    }

    fn invalid(&self, category: ErrorCategory) -> KplError {
        Diagnostic::invalid(category, self.cursor.peek()).into()
    }
}

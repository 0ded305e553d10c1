use super::{PResult, Parser};
use crate::lexer::literal_text;
use crate::loader::sanitize_module_name;
use scribble_core::ast::{
    Block, Branch, CaseStatement, DefaultCase, ExpressionStatement, ForStatement, FunctionDecl,
    FunctionDef, IfStatement, Import, IntrinsicDecl, NativeFunctionDecl, Node, NodeKind, Return,
    SwitchStatement, SyntaxNode, Variable, VariableDeclaration, WhileStatement,
};
use scribble_core::error::{ErrorCode, SyntaxError};
use scribble_core::span::Span;
use scribble_core::token::{Keyword, TokenCode};

impl Parser<'_> {
    /// One statement with error recovery; `None` when it was skipped.
    pub(crate) fn statement(&mut self) -> Option<Node> {
        match self.parse_statement() {
            Ok(node) => Some(node),
            Err(error) => self.recover(error),
        }
    }

    fn parse_statement(&mut self) -> PResult<Node> {
        match self.peek_code() {
            TokenCode::OpenBrace => self.block(),
            TokenCode::Semicolon => {
                let token = self.advance();
                Ok(SyntaxNode::node(token.location, NodeKind::Pass))
            }
            TokenCode::Keyword(Keyword::Var) | TokenCode::Keyword(Keyword::Const) => {
                self.variable_declaration()
            }
            TokenCode::Keyword(Keyword::Func) => self.function(),
            TokenCode::Keyword(Keyword::If) => self.if_statement(),
            TokenCode::Keyword(Keyword::Switch) => self.switch_statement(),
            TokenCode::Keyword(Keyword::While) => self.while_statement(),
            TokenCode::Keyword(Keyword::For) => self.for_statement(),
            TokenCode::Keyword(Keyword::Return) => self.return_statement(),
            TokenCode::Keyword(Keyword::Break) => self.jump(NodeKind::Break),
            TokenCode::Keyword(Keyword::Continue) => self.jump(NodeKind::Continue),
            TokenCode::Keyword(Keyword::Import) => self.import(),
            _ => self.expression_statement(),
        }
    }

    pub(crate) fn block(&mut self) -> PResult<Node> {
        let open = self.expect(TokenCode::OpenBrace, "'{'")?;
        let mut statements = Vec::new();
        loop {
            match self.peek_code() {
                TokenCode::CloseBrace => {
                    let close = self.advance();
                    return Ok(SyntaxNode::node(
                        open.location.merge(&close.location),
                        NodeKind::Block(Block {
                            statements,
                            closed: true,
                        }),
                    ));
                }
                TokenCode::EndOfFile => {
                    self.report_end_of_input("'}'");
                    let location = open.location.merge(&self.current().location);
                    return Ok(SyntaxNode::node(
                        location,
                        NodeKind::Block(Block {
                            statements,
                            closed: false,
                        }),
                    ));
                }
                _ => {
                    if let Some(statement) = self.statement() {
                        statements.push(statement);
                    }
                }
            }
        }
    }

    fn variable_declaration(&mut self) -> PResult<Node> {
        let keyword = self.advance();
        let constant = keyword.is_keyword(Keyword::Const);
        let name = self.expect(TokenCode::Identifier, "variable name")?;
        let variable = SyntaxNode::node(
            name.location,
            NodeKind::Variable(Variable {
                name: name.value.clone(),
                constant,
            }),
        );
        let initializer = match self.eat(TokenCode::Equals) {
            Some(_) => Some(self.expression()?),
            None => None,
        };
        let end = initializer.as_ref().unwrap_or(&variable).location;
        self.end_statement()?;
        Ok(SyntaxNode::node(
            keyword.location.merge(&end),
            NodeKind::VariableDeclaration(VariableDeclaration {
                variable,
                initializer,
            }),
        ))
    }

    fn function(&mut self) -> PResult<Node> {
        let keyword = self.advance();
        let name = self.expect(TokenCode::Identifier, "function name")?;
        let parameters = self.parameters()?;
        let declaration = SyntaxNode::node(
            keyword.location.merge(&self.previous_location()),
            NodeKind::FunctionDecl(FunctionDecl {
                name: name.value.clone(),
                parameters,
            }),
        );

        if self.eat(TokenCode::Arrow).is_some() {
            let target = self.expect(TokenCode::DoubleQuotedString, "command name")?;
            self.end_statement()?;
            return Ok(SyntaxNode::node(
                declaration.location.merge(&target.location),
                NodeKind::NativeFunctionDecl(NativeFunctionDecl {
                    declaration,
                    native_name: literal_text(&target),
                }),
            ));
        }
        if let Some(marker) = self.eat(TokenCode::Keyword(Keyword::Intrinsic)) {
            self.end_statement()?;
            return Ok(SyntaxNode::node(
                declaration.location.merge(&marker.location),
                NodeKind::IntrinsicDecl(IntrinsicDecl { declaration }),
            ));
        }
        if self.eat(TokenCode::Semicolon).is_some() {
            return Ok(declaration);
        }
        let body = self.parse_statement()?;
        Ok(SyntaxNode::node(
            declaration.location.merge(&body.location),
            NodeKind::FunctionDef(FunctionDef { declaration, body }),
        ))
    }

    /// `(a, b, c)`. Any token out of the identifier/comma alternation is a
    /// malformed list reported at that token.
    fn parameters(&mut self) -> PResult<Vec<Node>> {
        self.expect(TokenCode::OpenParen, "'('")?;
        let mut parameters: Vec<Node> = Vec::new();
        if self.eat(TokenCode::CloseParen).is_some() {
            return Ok(parameters);
        }
        loop {
            let token = self.current().clone();
            match token.code {
                TokenCode::Identifier => {
                    let duplicate = parameters
                        .iter()
                        .filter_map(|param| param.as_variable())
                        .any(|param| param.name == token.value);
                    if duplicate {
                        return Err(SyntaxError::new(
                            token.location,
                            ErrorCode::MalformedParameterList,
                            format!("duplicate parameter {token}"),
                        ));
                    }
                    self.advance();
                    parameters.push(SyntaxNode::node(
                        token.location,
                        NodeKind::Variable(Variable {
                            name: token.value.clone(),
                            constant: false,
                        }),
                    ));
                }
                TokenCode::EndOfFile | TokenCode::Unterminated => {
                    return Err(self.unexpected("parameter name"))
                }
                _ => {
                    return Err(malformed_parameters(
                        "parameter name",
                        &token.to_string(),
                        token.location,
                    ))
                }
            }

            let token = self.current().clone();
            match token.code {
                TokenCode::Comma => {
                    self.advance();
                }
                TokenCode::CloseParen => {
                    self.advance();
                    return Ok(parameters);
                }
                TokenCode::EndOfFile | TokenCode::Unterminated => {
                    return Err(self.unexpected("',' or ')'"))
                }
                _ => {
                    return Err(malformed_parameters(
                        "',' or ')'",
                        &token.to_string(),
                        token.location,
                    ))
                }
            }
        }
    }

    fn if_statement(&mut self) -> PResult<Node> {
        let mut branches = vec![self.branch()?];
        while self.at(TokenCode::Keyword(Keyword::Elif)) {
            branches.push(self.branch()?);
        }
        let else_branch = match self.eat(TokenCode::Keyword(Keyword::Else)) {
            Some(_) => Some(self.parse_statement()?),
            None => None,
        };
        let mut location = branches[0].location;
        if let Some(last) = else_branch.as_ref().or(branches.last()) {
            location = location.merge(&last.location);
        }
        Ok(SyntaxNode::node(
            location,
            NodeKind::IfStatement(IfStatement {
                branches,
                else_branch,
            }),
        ))
    }

    /// `if cond stmt` or `elif cond stmt`.
    fn branch(&mut self) -> PResult<Node> {
        let keyword = self.advance();
        let condition = self.expression()?;
        let statement = self.parse_statement()?;
        Ok(SyntaxNode::node(
            keyword.location.merge(&statement.location),
            NodeKind::Branch(Branch {
                condition,
                statement,
            }),
        ))
    }

    fn switch_statement(&mut self) -> PResult<Node> {
        let keyword = self.advance();
        let expression = self.expression()?;
        self.expect(TokenCode::OpenBrace, "'{'")?;
        let mut cases = Vec::new();
        let mut default = None;
        loop {
            let token = self.current().clone();
            match token.code {
                TokenCode::CloseBrace => {
                    self.advance();
                    return Ok(SyntaxNode::node(
                        keyword.location.merge(&token.location),
                        NodeKind::SwitchStatement(SwitchStatement {
                            expression,
                            cases,
                            default,
                            closed: true,
                        }),
                    ));
                }
                TokenCode::EndOfFile => {
                    self.report_end_of_input("'}'");
                    return Ok(SyntaxNode::node(
                        keyword.location.merge(&token.location),
                        NodeKind::SwitchStatement(SwitchStatement {
                            expression,
                            cases,
                            default,
                            closed: false,
                        }),
                    ));
                }
                TokenCode::Keyword(Keyword::Case) => {
                    self.advance();
                    let value = self.expression()?;
                    self.expect(TokenCode::Colon, "':'")?;
                    let statement = self.parse_statement()?;
                    cases.push(SyntaxNode::node(
                        token.location.merge(&statement.location),
                        NodeKind::CaseStatement(CaseStatement { value, statement }),
                    ));
                }
                TokenCode::Keyword(Keyword::Default) if default.is_none() => {
                    self.advance();
                    self.expect(TokenCode::Colon, "':'")?;
                    let statement = self.parse_statement()?;
                    default = Some(SyntaxNode::node(
                        token.location.merge(&statement.location),
                        NodeKind::DefaultCase(DefaultCase { statement }),
                    ));
                }
                _ => return Err(self.unexpected("'case', 'default' or '}'")),
            }
        }
    }

    fn while_statement(&mut self) -> PResult<Node> {
        let keyword = self.advance();
        self.expect(TokenCode::OpenParen, "'('")?;
        let condition = self.expression()?;
        self.expect(TokenCode::CloseParen, "')'")?;
        let statement = self.parse_statement()?;
        Ok(SyntaxNode::node(
            keyword.location.merge(&statement.location),
            NodeKind::WhileStatement(WhileStatement {
                condition,
                statement,
            }),
        ))
    }

    fn for_statement(&mut self) -> PResult<Node> {
        let keyword = self.advance();
        self.expect(TokenCode::OpenParen, "'('")?;
        let init = match self.peek_code() {
            TokenCode::Semicolon => {
                self.advance();
                None
            }
            TokenCode::Keyword(Keyword::Var) | TokenCode::Keyword(Keyword::Const) => {
                Some(self.variable_declaration()?)
            }
            _ => {
                let expression = self.expression()?;
                self.expect(TokenCode::Semicolon, "';'")?;
                Some(SyntaxNode::node(
                    expression.location,
                    NodeKind::ExpressionStatement(ExpressionStatement { expression }),
                ))
            }
        };
        let condition = if self.at(TokenCode::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenCode::Semicolon, "';'")?;
        let step = if self.at(TokenCode::CloseParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenCode::CloseParen, "')'")?;
        let statement = self.parse_statement()?;
        Ok(SyntaxNode::node(
            keyword.location.merge(&statement.location),
            NodeKind::ForStatement(ForStatement {
                init,
                condition,
                step,
                statement,
            }),
        ))
    }

    fn return_statement(&mut self) -> PResult<Node> {
        let keyword = self.advance();
        let expression = match self.peek_code() {
            TokenCode::Semicolon | TokenCode::CloseBrace | TokenCode::EndOfFile => None,
            _ => Some(self.expression()?),
        };
        let location = match &expression {
            Some(expr) => keyword.location.merge(&expr.location),
            None => keyword.location,
        };
        self.end_statement()?;
        Ok(SyntaxNode::node(
            location,
            NodeKind::Return(Return { expression }),
        ))
    }

    fn jump(&mut self, kind: NodeKind) -> PResult<Node> {
        let keyword = self.advance();
        self.end_statement()?;
        Ok(SyntaxNode::node(keyword.location, kind))
    }

    /// `import a/b/c;` records the module for resolution without loading it.
    fn import(&mut self) -> PResult<Node> {
        let keyword = self.advance();
        let first = self.expect(TokenCode::Identifier, "module name")?;
        let mut location = keyword.location.merge(&first.location);
        let mut path = vec![first.value];
        while self.eat(TokenCode::Slash).is_some() {
            let segment = self.expect(TokenCode::Identifier, "module name")?;
            location = location.merge(&segment.location);
            path.push(segment.value);
        }
        self.end_statement()?;

        let module = sanitize_module_name(&path.join("/"));
        tracing::trace!(importer = %self.module, module = %module, "import");
        let importer = self.module.clone();
        self.context.request_import(&importer, &module, location);
        Ok(SyntaxNode::node(
            location,
            NodeKind::Import(Import { path, module }),
        ))
    }

    fn expression_statement(&mut self) -> PResult<Node> {
        let expression = self.expression()?;
        self.end_statement()?;
        Ok(SyntaxNode::node(
            expression.location,
            NodeKind::ExpressionStatement(ExpressionStatement { expression }),
        ))
    }

    fn previous_location(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].location
    }
}

fn malformed_parameters(expected: &str, found: &str, location: Span) -> SyntaxError {
    SyntaxError::new(
        location,
        ErrorCode::MalformedParameterList,
        format!("malformed parameter list: expected {expected}, found {found}"),
    )
}

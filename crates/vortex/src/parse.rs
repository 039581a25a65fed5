//! Parser for vortex programs
//!
//! Recursive descent with one token of lookahead and no backtracking. The first
//! syntax error aborts the whole parse: callers get a complete `Program` or an
//! error, never a partial tree.
//!
//! ```text
//! program     := statement*
//! statement   := schema_def | edge_def | vertex_init | relation_init | query
//! expression  := clause ((and | or) clause)*
//! clause      := operation ((< | <= | > | >= | = | !=) operation)*
//! operation   := term ((+ | -) term)*
//! term        := factor ((* | /) factor)*
//! factor      := ( expression ) | builtin | relation_term vertex_term
//!              | INT | STRING | . ID | ID . ID | vertex_term
//! ```

use std::str::FromStr;

use crate::ast::{
    Edge, EdgeDef, EdgeType, Expr, FuncType, Literal, Program, Property, PropertyDef, PropertyInit,
    QueryStatement, Relation, RelationInit, SchemaDef, Statement, SumCall, Vertex, VertexInit,
    VertexTerm,
};
use crate::diagnostic::{Expected, ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind, TokenSource};

type PResult<T> = Result<T, ParseError>;

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of expressions (parentheses, filters, builtin arguments)
    pub max_depth: usize,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// Parse a complete vortex program from a string
pub fn parse(source: &str) -> PResult<Program> {
    Parser::new(Lexer::new(source)).parse()
}

pub struct Parser<S> {
    tokens: S,
    current: Token,
    options: ParseOptions,
    depth: usize,
}

impl<S: TokenSource> Parser<S> {
    pub fn new(tokens: S) -> Self {
        Self::with_options(tokens, ParseOptions::default())
    }

    pub fn with_options(mut tokens: S, options: ParseOptions) -> Self {
        let current = tokens.next_token();
        Self {
            tokens,
            current,
            options,
            depth: 0,
        }
    }

    pub fn parse(mut self) -> PResult<Program> {
        let result = self.program();
        if let Err(err) = &result {
            log::debug!(
                "parse aborted at {}:{} on {:?}: {:?}",
                err.token.row + 1,
                err.token.col + 1,
                err.token.text,
                err.kind
            );
        }
        result
    }

    // ============ Token helpers ============

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn advance(&mut self) -> Token {
        let next = self.tokens.next_token();
        std::mem::replace(&mut self.current, next)
    }

    /// Consume the current token if it is `kind`; otherwise fail without advancing.
    fn eat(&mut self, kind: TokenKind) -> PResult<Token> {
        if !self.check(kind) {
            return Err(self.unexpected(Expected::Token(kind)));
        }
        Ok(self.advance())
    }

    fn error_at(&self, kind: ParseErrorKind, token: Token) -> ParseError {
        let context = self.tokens.source_context(&token);
        ParseError::new(kind, context, token)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        self.error_at(kind, self.current.clone())
    }

    fn unexpected(&self, expected: Expected) -> ParseError {
        self.error(ParseErrorKind::UnexpectedToken { expected })
    }

    fn integer<T: FromStr>(&mut self) -> PResult<T> {
        if !self.check(TokenKind::IntegerConstant) {
            return Err(self.unexpected(Expected::Token(TokenKind::IntegerConstant)));
        }
        match self.current.text.parse::<T>() {
            Ok(n) => {
                self.advance();
                Ok(n)
            }
            Err(_) => Err(self.error(ParseErrorKind::InvalidInteger)),
        }
    }

    // ============ Statements ============

    fn program(&mut self) -> PResult<Program> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::Eof) {
            let statement = match self.current.kind {
                TokenKind::Schema => Statement::Schema(self.schema_def()?),
                TokenKind::Edge => Statement::Edge(self.edge_def()?),
                TokenKind::Vertex => Statement::Vertex(self.vertex_init()?),
                TokenKind::Relation => Statement::Relation(self.relation_init()?),
                TokenKind::Query => Statement::Query(self.query_statement()?),
                _ => return Err(self.error(ParseErrorKind::UnknownStatement)),
            };
            log::debug!("parsed statement {:?}", statement.name().unwrap_or("Query"));
            statements.push(statement);
        }
        Ok(Program { statements })
    }

    /// `Schema ID { (ID TYPE)* }`
    fn schema_def(&mut self) -> PResult<SchemaDef> {
        self.eat(TokenKind::Schema)?;
        let name = self.eat(TokenKind::Identifier)?.text;
        self.eat(TokenKind::LBrace)?;
        let properties = self.property_defs()?;
        self.eat(TokenKind::RBrace)?;
        Ok(SchemaDef { name, properties })
    }

    fn property_defs(&mut self) -> PResult<Vec<PropertyDef>> {
        let mut properties = Vec::new();
        while self.check(TokenKind::Identifier) {
            let name = self.advance().text;
            let type_token = match self.current.kind {
                TokenKind::IntType | TokenKind::StringType => self.advance(),
                _ => {
                    return Err(self.unexpected(Expected::OneOf(vec![
                        TokenKind::IntType,
                        TokenKind::StringType,
                    ])));
                }
            };
            properties.push(PropertyDef { name, type_token });
        }
        Ok(properties)
    }

    /// `Edge ID (OneWay | TwoWay)`
    fn edge_def(&mut self) -> PResult<EdgeDef> {
        self.eat(TokenKind::Edge)?;
        let name = self.eat(TokenKind::Identifier)?.text;
        let edge_type = match EdgeType::from_name(&self.current.text) {
            Some(edge_type) if self.check(TokenKind::Identifier) => edge_type,
            _ => return Err(self.error(ParseErrorKind::UnknownEdgeType)),
        };
        self.advance();
        Ok(EdgeDef { name, edge_type })
    }

    /// `Vertex ID ID { (. ID = LITERAL)* }`
    fn vertex_init(&mut self) -> PResult<VertexInit> {
        self.eat(TokenKind::Vertex)?;
        let name = self.eat(TokenKind::Identifier)?.text;
        let schema = self.eat(TokenKind::Identifier)?.text;
        self.eat(TokenKind::LBrace)?;
        let properties = self.property_inits()?;
        self.eat(TokenKind::RBrace)?;
        Ok(VertexInit {
            schema,
            name,
            properties,
        })
    }

    fn property_inits(&mut self) -> PResult<Vec<PropertyInit>> {
        let mut properties = Vec::new();
        while self.check(TokenKind::Dot) {
            self.advance();
            let name = self.eat(TokenKind::Identifier)?.text;
            self.eat(TokenKind::Equal)?;
            let value = match self.current.kind {
                TokenKind::IntegerConstant => Literal::Int(self.integer()?),
                TokenKind::StringConstant => Literal::Str(self.advance().text),
                _ => {
                    return Err(self.unexpected(Expected::OneOf(vec![
                        TokenKind::IntegerConstant,
                        TokenKind::StringConstant,
                    ])));
                }
            };
            properties.push(PropertyInit { name, value });
        }
        Ok(properties)
    }

    /// `Relation ID { ID ID }`
    fn relation_init(&mut self) -> PResult<RelationInit> {
        self.eat(TokenKind::Relation)?;
        let relation = self.eat(TokenKind::Identifier)?.text;
        self.eat(TokenKind::LBrace)?;
        let left = self.eat(TokenKind::Identifier)?.text;
        let right = self.eat(TokenKind::Identifier)?.text;
        self.eat(TokenKind::RBrace)?;
        Ok(RelationInit {
            left,
            relation,
            right,
        })
    }

    /// `Query expression`
    fn query_statement(&mut self) -> PResult<QueryStatement> {
        self.eat(TokenKind::Query)?;
        let expression = self.expression()?;
        Ok(QueryStatement { expression })
    }

    // ============ Expressions (precedence climbing) ============

    fn expression(&mut self) -> PResult<Expr> {
        if self.depth >= self.options.max_depth {
            return Err(self.error(ParseErrorKind::NestingTooDeep {
                limit: self.options.max_depth,
            }));
        }
        self.depth += 1;
        let result = self.binary_level(Self::clause, |k| {
            matches!(k, TokenKind::And | TokenKind::Or)
        });
        self.depth -= 1;
        result
    }

    fn clause(&mut self) -> PResult<Expr> {
        self.binary_level(Self::operation, TokenKind::is_comparison)
    }

    fn operation(&mut self) -> PResult<Expr> {
        self.binary_level(Self::term, |k| {
            matches!(k, TokenKind::Plus | TokenKind::Minus)
        })
    }

    fn term(&mut self) -> PResult<Expr> {
        self.binary_level(Self::factor, |k| {
            matches!(k, TokenKind::Star | TokenKind::Slash)
        })
    }

    /// One left-associative level: `next (op next)*`, folded left to right.
    fn binary_level(
        &mut self,
        next: fn(&mut Self) -> PResult<Expr>,
        is_operator: fn(TokenKind) -> bool,
    ) -> PResult<Expr> {
        let mut left = next(self)?;
        while is_operator(self.current.kind) {
            let operator = self.advance();
            let right = next(self)?;
            left = left.binary(operator, right);
        }
        Ok(left)
    }

    fn factor(&mut self) -> PResult<Expr> {
        match self.current.kind {
            TokenKind::LParen => {
                self.advance();
                let expression = self.expression()?;
                self.eat(TokenKind::RParen)?;
                Ok(expression)
            }
            TokenKind::Function => self.builtin_call(),
            TokenKind::LBracket => {
                let edge = self.relation_term()?;
                let vertex = self.vertex_term()?;
                Ok(Expr::Relation(Relation { edge, vertex }))
            }
            TokenKind::IntegerConstant => Ok(Expr::int(self.integer()?)),
            TokenKind::StringConstant => Ok(Expr::string(self.advance().text)),
            TokenKind::Dot => {
                self.advance();
                let name = self.eat(TokenKind::Identifier)?.text;
                Ok(Expr::Property(Property { name, alias: None }))
            }
            TokenKind::Identifier => self.identifier_led(),
            _ => Err(self.unexpected(Expected::OneOf(vec![
                TokenKind::LParen,
                TokenKind::Function,
                TokenKind::LBracket,
                TokenKind::IntegerConstant,
                TokenKind::StringConstant,
                TokenKind::Dot,
                TokenKind::Identifier,
            ]))),
        }
    }

    /// `ID . ID` (aliased property) or `ID (as ID)? ({ expression })?` (vertex term)
    fn identifier_led(&mut self) -> PResult<Expr> {
        let id = self.eat(TokenKind::Identifier)?.text;
        if self.check(TokenKind::Dot) {
            self.advance();
            let name = self.eat(TokenKind::Identifier)?.text;
            return Ok(Expr::Property(Property {
                name,
                alias: Some(id),
            }));
        }
        let alias = self.alias()?;
        let vertex = Vertex {
            name: Some(id),
            alias,
        };
        Ok(Expr::VertexTerm(self.condition(vertex)?))
    }

    fn alias(&mut self) -> PResult<Option<String>> {
        if !self.check(TokenKind::As) {
            return Ok(None);
        }
        self.advance();
        Ok(Some(self.eat(TokenKind::Identifier)?.text))
    }

    /// `(ID (as ID)? | ( )) ({ expression })?`
    fn vertex_term(&mut self) -> PResult<VertexTerm> {
        let vertex = match self.current.kind {
            TokenKind::Identifier => {
                let name = self.advance().text;
                let alias = self.alias()?;
                Vertex {
                    name: Some(name),
                    alias,
                }
            }
            TokenKind::LParen => {
                self.unit()?;
                Vertex {
                    name: None,
                    alias: None,
                }
            }
            _ => {
                return Err(self.unexpected(Expected::OneOf(vec![
                    TokenKind::Identifier,
                    TokenKind::LParen,
                ])));
            }
        };
        self.condition(vertex)
    }

    fn condition(&mut self, vertex: Vertex) -> PResult<VertexTerm> {
        if !self.check(TokenKind::LBrace) {
            return Ok(VertexTerm {
                vertex,
                condition: None,
            });
        }
        self.advance();
        let condition = self.expression()?;
        self.eat(TokenKind::RBrace)?;
        Ok(VertexTerm {
            vertex,
            condition: Some(Box::new(condition)),
        })
    }

    /// `[ (INT | INT? .. INT?)? ] (ID | ( ))`
    fn relation_term(&mut self) -> PResult<Edge> {
        self.eat(TokenKind::LBracket)?;

        let (lower, upper) = if self.check(TokenKind::RBracket) {
            (1, 1)
        } else {
            let mut lower: u64 = 0;
            let mut upper = Edge::UNBOUNDED;
            if self.check(TokenKind::IntegerConstant) {
                lower = self.integer()?;
                upper = lower;
            }
            if self.check(TokenKind::Range) {
                self.advance();
                upper = Edge::UNBOUNDED;
                if self.check(TokenKind::IntegerConstant) {
                    upper = self.integer()?;
                }
            }
            (lower, upper)
        };
        self.eat(TokenKind::RBracket)?;

        let name = match self.current.kind {
            TokenKind::Identifier => Some(self.advance().text),
            TokenKind::LParen => {
                self.unit()?;
                None
            }
            _ => {
                return Err(self.unexpected(Expected::OneOf(vec![
                    TokenKind::Identifier,
                    TokenKind::LParen,
                ])));
            }
        };

        Ok(Edge { name, lower, upper })
    }

    /// The any-edge / any-vertex marker `()`
    fn unit(&mut self) -> PResult<()> {
        self.eat(TokenKind::LParen)?;
        self.eat(TokenKind::RParen)?;
        Ok(())
    }

    /// `Sum expression (, expression)*`
    fn builtin_call(&mut self) -> PResult<Expr> {
        let function = self.eat(TokenKind::Function)?;
        match FuncType::from_name(&function.text) {
            Some(FuncType::Sum) => {
                let mut args = vec![self.expression()?];
                while self.check(TokenKind::Comma) {
                    self.advance();
                    args.push(self.expression()?);
                }
                Ok(Expr::Sum(SumCall {
                    func: FuncType::Sum,
                    args,
                }))
            }
            _ => Err(self.error_at(ParseErrorKind::UnknownBuiltinFunc, function)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::ast::{BinOp, PropertyType};

    /// Scripted token stream; returns EOF once exhausted.
    struct Script {
        tokens: VecDeque<Token>,
        context: String,
    }

    impl Script {
        fn new(tokens: &[(TokenKind, &str)]) -> Self {
            Self {
                tokens: tokens
                    .iter()
                    .map(|(kind, text)| Token::new(*kind, *text, 0, 0, text.len()))
                    .collect(),
                context: String::new(),
            }
        }
    }

    impl TokenSource for Script {
        fn next_token(&mut self) -> Token {
            self.tokens
                .pop_front()
                .unwrap_or_else(|| Token::new(TokenKind::Eof, "EOF", 0, 0, 0))
        }

        fn source_context(&self, _token: &Token) -> String {
            self.context.clone()
        }
    }

    fn expr(source: &str) -> Expr {
        Parser::new(Lexer::new(source)).expression().unwrap()
    }

    fn edge(source: &str) -> Edge {
        match expr(source) {
            Expr::Relation(relation) => relation.edge,
            other => panic!("Expected relation, got {:?}", other),
        }
    }

    fn unwrap_binary(e: Expr) -> (Expr, BinOp, Expr) {
        match e {
            Expr::Binary(b) => {
                let op = b.op().unwrap();
                (*b.left, op, *b.right)
            }
            other => panic!("Expected binary, got {:?}", other),
        }
    }

    // ============ Statements ============

    #[test]
    fn property_defs() {
        let mut p = Parser::new(Script::new(&[
            (TokenKind::Identifier, "name"),
            (TokenKind::StringType, "string"),
            (TokenKind::Identifier, "age"),
            (TokenKind::IntType, "int"),
        ]));
        let properties = p.property_defs().unwrap();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].name, "name");
        assert_eq!(properties[0].ty(), Some(PropertyType::String));
        assert_eq!(properties[1].name, "age");
        assert_eq!(properties[1].ty(), Some(PropertyType::Int));
    }

    #[test]
    fn property_inits() {
        let mut p = Parser::new(Script::new(&[
            (TokenKind::Dot, "."),
            (TokenKind::Identifier, "name"),
            (TokenKind::Equal, "="),
            (TokenKind::StringConstant, "John"),
            (TokenKind::Dot, "."),
            (TokenKind::Identifier, "age"),
            (TokenKind::Equal, "="),
            (TokenKind::IntegerConstant, "26"),
        ]));
        let properties = p.property_inits().unwrap();
        assert_eq!(
            properties,
            vec![
                PropertyInit {
                    name: "name".into(),
                    value: Literal::Str("John".into()),
                },
                PropertyInit {
                    name: "age".into(),
                    value: Literal::Int(26),
                },
            ]
        );
    }

    #[test]
    fn schema_def() {
        let program = parse("Schema Person { name string age int }").unwrap();
        let Statement::Schema(schema) = &program.statements[0] else {
            panic!("Expected schema");
        };
        assert_eq!(schema.name, "Person");
        assert_eq!(schema.properties.len(), 2);
        assert_eq!(schema.properties[1].type_token.text, "int");
    }

    #[test]
    fn schema_def_rejects_unknown_type() {
        let err = parse("Schema Person { name bool }").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                expected: Expected::OneOf(vec![TokenKind::IntType, TokenKind::StringType]),
            }
        );
        assert_eq!(err.token.text, "bool");
    }

    #[test]
    fn edge_def() {
        let program = parse("Edge LivesIn OneWay Edge Knows TwoWay").unwrap();
        assert_eq!(
            program.statements,
            vec![
                Statement::Edge(EdgeDef {
                    name: "LivesIn".into(),
                    edge_type: EdgeType::OneWay,
                }),
                Statement::Edge(EdgeDef {
                    name: "Knows".into(),
                    edge_type: EdgeType::TwoWay,
                }),
            ]
        );
    }

    #[test]
    fn edge_def_unknown_type() {
        let err = parse("Edge LivesIn Sideways").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownEdgeType);
        assert_eq!(err.token.text, "Sideways");
        assert_eq!(err.token.col, 13);
    }

    #[test]
    fn vertex_init() {
        let program = parse(r#"Vertex Harry Person { .name = "Harry" .age = 11 }"#).unwrap();
        assert_eq!(
            program.statements[0],
            Statement::Vertex(VertexInit {
                schema: "Person".into(),
                name: "Harry".into(),
                properties: vec![
                    PropertyInit {
                        name: "name".into(),
                        value: Literal::Str("Harry".into()),
                    },
                    PropertyInit {
                        name: "age".into(),
                        value: Literal::Int(11),
                    },
                ],
            })
        );
    }

    #[test]
    fn vertex_init_requires_literal() {
        let err = parse("Vertex Harry Person { .name = Harry }").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                expected: Expected::OneOf(vec![
                    TokenKind::IntegerConstant,
                    TokenKind::StringConstant,
                ]),
            }
        );
    }

    #[test]
    fn relation_init() {
        let program = parse("Relation LivesIn { Harry London }").unwrap();
        assert_eq!(
            program.statements[0],
            Statement::Relation(RelationInit {
                left: "Harry".into(),
                relation: "LivesIn".into(),
                right: "London".into(),
            })
        );
    }

    #[test]
    fn unknown_statement() {
        let err = parse("Schema A {} Person").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownStatement);
        assert_eq!(err.token.text, "Person");
    }

    #[test]
    fn empty_program() {
        assert_eq!(parse("  \n ").unwrap(), Program::default());
    }

    // ============ Factors ============

    #[test]
    fn factor_literals() {
        assert_eq!(expr("42"), Expr::int(42));
        assert_eq!(expr(r#""John""#), Expr::string("John"));
    }

    #[test]
    fn factor_properties() {
        assert_eq!(
            expr(".name"),
            Expr::Property(Property {
                name: "name".into(),
                alias: None,
            })
        );
        assert_eq!(
            expr("P.name"),
            Expr::Property(Property {
                name: "name".into(),
                alias: Some("P".into()),
            })
        );
    }

    #[test]
    fn factor_vertices() {
        assert_eq!(
            expr("Person as P"),
            Expr::VertexTerm(VertexTerm {
                vertex: Vertex {
                    name: Some("Person".into()),
                    alias: Some("P".into()),
                },
                condition: None,
            })
        );
        assert_eq!(
            expr("Person"),
            Expr::VertexTerm(VertexTerm {
                vertex: Vertex {
                    name: Some("Person".into()),
                    alias: None,
                },
                condition: None,
            })
        );
    }

    #[test]
    fn relation_bounds() {
        let cases = [
            ("[]X Y", 1, 1),
            ("[2]X Y", 2, 2),
            ("[..]X Y", 0, Edge::UNBOUNDED),
            ("[2..]X Y", 2, Edge::UNBOUNDED),
            ("[..4]X Y", 0, 4),
            ("[2..4]X Y", 2, 4),
        ];
        for (source, lower, upper) in cases {
            let e = edge(source);
            assert_eq!((e.lower, e.upper), (lower, upper), "{source}");
            assert_eq!(e.is_unbounded(), upper == Edge::UNBOUNDED, "{source}");
            assert_eq!(e.name.as_deref(), Some("X"));
        }
    }

    #[test]
    fn relation_any_edge_any_vertex() {
        let Expr::Relation(relation) = expr("[]() ()") else {
            panic!("Expected relation");
        };
        assert_eq!(relation.edge.name, None);
        assert_eq!(relation.vertex.vertex.name, None);
        assert_eq!(relation.vertex.condition, None);
    }

    #[test]
    fn relation_requires_edge() {
        let err = Parser::new(Lexer::new("[] 3")).expression().unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                expected: Expected::OneOf(vec![TokenKind::Identifier, TokenKind::LParen]),
            }
        );
    }

    #[test]
    fn vertex_term_with_condition() {
        let Expr::VertexTerm(term) = expr(r#"Person { .name = "John" }"#) else {
            panic!("Expected vertex term");
        };
        let (left, op, right) = unwrap_binary(*term.condition.unwrap());
        assert_eq!(op, BinOp::Eq);
        assert!(matches!(left, Expr::Property(ref p) if p.name == "name"));
        assert_eq!(right, Expr::string("John"));
    }

    #[test]
    fn vertex_term_with_nested_condition() {
        let Expr::VertexTerm(term) =
            expr("Person as P { []FriendsWith Person { .age > P.age } and .age < 30 }")
        else {
            panic!("Expected vertex term");
        };
        let (left, op, _) = unwrap_binary(*term.condition.unwrap());
        assert_eq!(op, BinOp::And);
        let Expr::Relation(relation) = left else {
            panic!("Expected relation");
        };
        assert_eq!(relation.edge.name.as_deref(), Some("FriendsWith"));
        let (_, inner, right) = unwrap_binary(*relation.vertex.condition.unwrap());
        assert_eq!(inner, BinOp::Gt);
        assert!(matches!(right, Expr::Property(ref p) if p.alias.as_deref() == Some("P")));
    }

    #[test]
    fn builtin_sum() {
        let Expr::Sum(call) = expr(r#"Sum(Person { .name = "John" })"#) else {
            panic!("Expected Sum");
        };
        assert_eq!(call.func, FuncType::Sum);
        assert_eq!(call.args.len(), 1);
        assert!(matches!(call.args[0], Expr::VertexTerm(_)));
    }

    #[test]
    fn builtin_sum_extra_arguments() {
        let Expr::Sum(call) = expr("Sum Person, 1, .age") else {
            panic!("Expected Sum");
        };
        assert_eq!(call.args.len(), 3);
        assert_eq!(call.args[1], Expr::int(1));
    }

    #[test]
    fn builtin_unknown() {
        let err = parse("Query Max(1)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownBuiltinFunc);
        assert_eq!(err.token.text, "Max");
    }

    // ============ Precedence ============

    #[test]
    fn left_associative_subtraction() {
        let (left, op, right) = unwrap_binary(expr("1 - 2 - 3"));
        assert_eq!(op, BinOp::Sub);
        assert_eq!(right, Expr::int(3));
        let (a, inner, b) = unwrap_binary(left);
        assert_eq!((a, inner, b), (Expr::int(1), BinOp::Sub, Expr::int(2)));
    }

    #[test]
    fn precedence_levels() {
        // 1 + 2 * 3 > 4 and 5 = 5  ==>  ((1 + (2 * 3)) > 4) and (5 = 5)
        let (left, op, right) = unwrap_binary(expr("1 + 2 * 3 > 4 and 5 = 5"));
        assert_eq!(op, BinOp::And);
        assert!(matches!(unwrap_binary(right).1, BinOp::Eq));
        let (sum, cmp, _) = unwrap_binary(left);
        assert_eq!(cmp, BinOp::Gt);
        let (_, add, product) = unwrap_binary(sum);
        assert_eq!(add, BinOp::Add);
        assert_eq!(unwrap_binary(product).1, BinOp::Mul);
    }

    #[test]
    fn parentheses_override_precedence() {
        let (left, op, _) = unwrap_binary(expr("(1 + 2) * 3"));
        assert_eq!(op, BinOp::Mul);
        assert_eq!(unwrap_binary(left).1, BinOp::Add);
    }

    #[test]
    fn not_equal_operator() {
        assert_eq!(unwrap_binary(expr(".age != 3")).1, BinOp::Ne);
    }

    // ============ Errors ============

    #[test]
    fn unexpected_token_message() {
        let mut script = Script::new(&[]);
        script.tokens = VecDeque::from(vec![
            Token::new(TokenKind::Query, "Query", 0, 0, 5),
            Token::new(TokenKind::Identifier, "Person", 0, 7, 6),
            Token::new(TokenKind::As, "as", 0, 14, 2),
            Token::new(TokenKind::LBrace, "{", 0, 18, 1),
        ]);
        script.context = "1\t|\tQuery  Person as  {\n".into();

        let err = Parser::new(script).parse().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: Unexpected \"{\" found\n\
             1\t|\tQuery  Person as  {\n\
             \t\t                  ^--Did you mean \"<identifier>\"?\n"
        );
    }

    #[test]
    fn eat_does_not_advance_on_mismatch() {
        let mut p = Parser::new(Lexer::new("x y"));
        assert!(p.eat(TokenKind::Dot).is_err());
        assert_eq!(p.current.text, "x");
        assert_eq!(p.eat(TokenKind::Identifier).unwrap().text, "x");
        assert_eq!(p.current.text, "y");
    }

    #[test]
    fn first_error_aborts_parse() {
        let source = "Schema A { x int }\nEdge E OneWay\nQuery A {";
        let err = parse(source).unwrap_err();
        assert_eq!(err.token.kind, TokenKind::Eof);
        assert_eq!(err.context, "3\t|\tQuery A {\n");
    }

    #[test]
    fn invalid_integer() {
        let err = parse("Query 99999999999999999999").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidInteger);
        assert!(err.to_string().starts_with("Error: Invalid \"99999999999999999999\" found\n"));
    }

    #[test]
    fn nesting_limit() {
        let options = ParseOptions::new().with_max_depth(3);
        let ok = Parser::with_options(Lexer::new("Query ((1))"), options).parse();
        assert!(ok.is_ok());

        let err = Parser::with_options(Lexer::new("Query (((1)))"), options)
            .parse()
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep { limit: 3 });
    }

    #[test]
    fn default_nesting_fits_a_small_stack() {
        let limit = ParseOptions::default().max_depth;
        let sources: [fn(usize) -> String; 2] = [
            |n| format!("Query {}1{}", "(".repeat(n), ")".repeat(n)),
            |n| format!("Query {}1{}", "[]E A { ".repeat(n), " }".repeat(n)),
        ];

        let handle = std::thread::Builder::new()
            .stack_size(2 << 20)
            .spawn(move || {
                for nested in sources {
                    assert!(parse(&nested(limit - 1)).is_ok());
                    let err = parse(&nested(limit)).unwrap_err();
                    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep { limit });
                }
            })
            .unwrap();
        handle.join().unwrap();
    }
}

//! Syntax tree interface consumed by the lowering compiler
//!
//! Parsing lives outside this crate. The compiler only needs to ask a node
//! for its kind, its children, its operator and, for literals, its value.
//! [`Node`] is a plain owned tree implementing [`SyntaxNode`], used by the
//! CLI demo and the tests.

use core_types::{HostContext, Value};

/// Syntactic category of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Numeric literal
    NumberLiteral,
    /// String literal
    StringLiteral,
    /// `true` / `false`
    BooleanLiteral,
    /// `null`
    NullLiteral,
    /// `undefined`
    UndefinedLiteral,
    /// Variable reference
    Identifier,
    /// `left op right`
    BinaryExpression,
    /// `op operand`
    UnaryExpression,
    /// `target = value`
    AssignmentExpression,
    /// `callee(args...)`
    CallExpression,
    /// `object.property`
    MemberExpression,
    /// Expression used as a statement
    ExpressionStatement,
    /// `let`/`const`/`var` declaration
    VariableDeclaration,
    /// Single declarator inside a declaration
    VariableDeclarator,
    /// `{ ... }`
    BlockStatement,
    /// `if (test) ... else ...`
    IfStatement,
    /// Top-level statement list
    Program,
}

impl NodeKind {
    /// Whether this kind is a literal that evaluates without context
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            NodeKind::NumberLiteral
                | NodeKind::StringLiteral
                | NodeKind::BooleanLiteral
                | NodeKind::NullLiteral
                | NodeKind::UndefinedLiteral
        )
    }

    /// Whether this kind lowers as an in-order sequence of its children
    pub fn is_sequence(self) -> bool {
        matches!(
            self,
            NodeKind::Program | NodeKind::BlockStatement | NodeKind::ExpressionStatement
        )
    }
}

/// Operations the compiler needs from a syntax tree node
pub trait SyntaxNode {
    /// Syntactic kind
    fn kind(&self) -> NodeKind;

    /// Evaluate the node directly; literals yield their value
    fn evaluate(&self, ctx: &mut HostContext) -> Value;

    /// Child nodes in source order
    fn children(&self) -> Vec<&dyn SyntaxNode>;

    /// Operator text for unary/binary/assignment nodes
    fn operator(&self) -> Option<&str> {
        None
    }

    /// Identifier name, if the node is an identifier
    fn name(&self) -> Option<&str> {
        None
    }

    /// Callee identity for call nodes
    fn callee_name(&self) -> Option<&str> {
        None
    }
}

/// Owned syntax tree node
#[derive(Debug, Clone)]
pub struct Node {
    /// Syntactic kind
    pub kind: NodeKind,
    /// Literal payload
    pub value: Option<Value>,
    /// Operator for expressions
    pub operator: Option<String>,
    /// Identifier or callee name
    pub name: Option<String>,
    /// Child nodes
    pub children: Vec<Node>,
}

impl Node {
    fn leaf(kind: NodeKind, value: Option<Value>) -> Self {
        Self {
            kind,
            value,
            operator: None,
            name: None,
            children: Vec::new(),
        }
    }

    /// Numeric literal
    pub fn number(n: f64) -> Self {
        Self::leaf(NodeKind::NumberLiteral, Some(Value::Number(n)))
    }

    /// String literal
    pub fn string(s: impl Into<String>) -> Self {
        Self::leaf(NodeKind::StringLiteral, Some(Value::String(s.into())))
    }

    /// Boolean literal
    pub fn boolean(b: bool) -> Self {
        Self::leaf(NodeKind::BooleanLiteral, Some(Value::Boolean(b)))
    }

    /// `null`
    pub fn null() -> Self {
        Self::leaf(NodeKind::NullLiteral, Some(Value::Null))
    }

    /// `undefined`
    pub fn undefined() -> Self {
        Self::leaf(NodeKind::UndefinedLiteral, Some(Value::Undefined))
    }

    /// Variable reference
    pub fn identifier(name: impl Into<String>) -> Self {
        let mut node = Self::leaf(NodeKind::Identifier, None);
        node.name = Some(name.into());
        node
    }

    /// Binary expression `left op right`
    pub fn binary(op: impl Into<String>, left: Node, right: Node) -> Self {
        Self {
            kind: NodeKind::BinaryExpression,
            value: None,
            operator: Some(op.into()),
            name: None,
            children: vec![left, right],
        }
    }

    /// Call of a named function
    pub fn call(callee: impl Into<String>, args: Vec<Node>) -> Self {
        Self {
            kind: NodeKind::CallExpression,
            value: None,
            operator: None,
            name: Some(callee.into()),
            children: args,
        }
    }

    /// Expression statement wrapping `expr`
    pub fn expression_statement(expr: Node) -> Self {
        Self::with_children(NodeKind::ExpressionStatement, vec![expr])
    }

    /// Block of statements
    pub fn block(statements: Vec<Node>) -> Self {
        Self::with_children(NodeKind::BlockStatement, statements)
    }

    /// Top-level program
    pub fn program(statements: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Program, statements)
    }

    /// Any other kind with the given children
    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            value: None,
            operator: None,
            name: None,
            children,
        }
    }
}

/// Unknown operators lower to `ADD`, so they evaluate like `+`
fn apply_binary(op: &str, left: Value, right: Value) -> Value {
    match op {
        "-" => Value::Number(left.to_number() - right.to_number()),
        "*" => Value::Number(left.to_number() * right.to_number()),
        "/" => Value::Number(left.to_number() / right.to_number()),
        _ => match (&left, &right) {
            (Value::Number(x), Value::Number(y)) => Value::Number(x + y),
            _ => Value::String(format!(
                "{}{}",
                left.to_display_string(),
                right.to_display_string()
            )),
        },
    }
}

impl SyntaxNode for Node {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn evaluate(&self, ctx: &mut HostContext) -> Value {
        if self.kind.is_literal() {
            return self.value.clone().unwrap_or_default();
        }
        match self.kind {
            NodeKind::BinaryExpression if self.children.len() == 2 => {
                let left = self.children[0].evaluate(ctx);
                let right = self.children[1].evaluate(ctx);
                apply_binary(self.operator.as_deref().unwrap_or("+"), left, right)
            }
            NodeKind::Identifier | NodeKind::CallExpression => Value::Undefined,
            _ => self
                .children
                .iter()
                .map(|child| child.evaluate(ctx))
                .last()
                .unwrap_or_default(),
        }
    }

    fn children(&self) -> Vec<&dyn SyntaxNode> {
        self.children
            .iter()
            .map(|child| child as &dyn SyntaxNode)
            .collect()
    }

    fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    fn name(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Identifier => self.name.as_deref(),
            _ => None,
        }
    }

    fn callee_name(&self) -> Option<&str> {
        match self.kind {
            NodeKind::CallExpression => self.name.as_deref(),
            _ => None,
        }
    }
}

//! Abstract Syntax Tree for `OpenQASM` 2.

use qforge_ir::{BitRef, RegisterKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// A complete QASM program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// QASM version (e.g., "2.0").
    pub version: String,
    /// Statements in the program.
    pub statements: Vec<Statement>,
}

impl Program {
    /// Create an empty program.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            statements: vec![],
        }
    }

    /// Append a statement.
    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }
}

impl fmt::Display for Program {
    /// Header line, then one terminated statement per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OPENQASM {};", self.version)?;
        for statement in &self.statements {
            write_terminated(f, statement)?;
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// A statement in a QASM program.
///
/// `Display` renders the statement without its `;`; containers add it
/// unless [`Statement::is_self_terminating`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Include directive.
    Include(Include),
    /// Register declaration: `qreg q[n]` or `creg c[n]`.
    RegisterDecl(RegisterDecl),
    /// Gate declaration.
    GateDecl(GateDecl),
    /// Gate application.
    GateCall(GateCall),
    /// Built-in `U` or `CX` application.
    UniversalUnitary(UniversalUnitary),
    /// Barrier: `barrier q[0],q[1]`
    Barrier(Vec<Argument>),
    /// Guarded statement: `if(c==1) <body>`
    Conditional {
        /// Classical register compared.
        register: Id,
        /// Value the register must hold.
        value: u64,
        /// Guarded statement.
        body: Box<Statement>,
    },
    /// Line comment.
    Comment(Comment),
}

impl Statement {
    /// Whether the rendered text already ends the statement.
    pub fn is_self_terminating(&self) -> bool {
        matches!(self, Statement::Comment(_) | Statement::GateDecl(_))
    }

    /// Guard this statement with `if(register==value)`.
    #[must_use]
    pub fn guarded(self, register: impl Into<Id>, value: u64) -> Self {
        Statement::Conditional {
            register: register.into(),
            value,
            body: Box::new(self),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Include(include) => write!(f, "{include}"),
            Statement::RegisterDecl(decl) => write!(f, "{decl}"),
            Statement::GateDecl(decl) => write!(f, "{decl}"),
            Statement::GateCall(call) => write!(f, "{call}"),
            Statement::UniversalUnitary(unitary) => write_unitary(f, unitary),
            Statement::Barrier(args) => write!(f, "barrier {}", join(args)),
            Statement::Conditional {
                register,
                value,
                body,
            } => write!(f, "if({register}=={value}) {body}"),
            Statement::Comment(comment) => write!(f, "{comment}"),
        }
    }
}

fn write_terminated(f: &mut fmt::Formatter<'_>, statement: &Statement) -> fmt::Result {
    write!(f, "{statement}")?;
    if !statement.is_self_terminating() {
        f.write_str(";")?;
    }
    Ok(())
}

fn write_unitary(f: &mut fmt::Formatter<'_>, unitary: &UniversalUnitary) -> fmt::Result {
    match unitary {
        UniversalUnitary::U { params, target } => write!(f, "U({}) {target}", join(params)),
        UniversalUnitary::CX { control, target } => write!(f, "CX {control},{target}"),
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// An identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Id(String);

impl Id {
    /// Create an identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Id(name.into())
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Id::new(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Id(name)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `include "<path>"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Include {
    /// Included file path, without quotes.
    pub path: String,
}

impl Include {
    /// Create an include directive.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "include \"{}\"", self.path)
    }
}

/// Register declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDecl {
    /// `qreg` or `creg`.
    pub kind: RegisterKind,
    /// Register name.
    pub name: Id,
    /// Number of bits.
    pub size: u32,
}

impl fmt::Display for RegisterDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}[{}]", self.kind.keyword(), self.name, self.size)
    }
}

/// `// text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Text after `//`.
    pub text: String,
}

impl Comment {
    /// Create a comment.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "// {}", self.text)
    }
}

/// An identifier with an index: `q[0]`.
///
/// Has no text form of its own; [`Argument`] renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedId {
    /// Base identifier.
    pub id: Id,
    /// Index expression.
    pub index: Expression,
}

impl IndexedId {
    /// Create `id[index]`.
    pub fn new(id: impl Into<Id>, index: u32) -> Self {
        Self {
            id: id.into(),
            index: Expression::Int(i64::from(index)),
        }
    }
}

/// A qubit argument: a whole register/formal, or one indexed position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Argument {
    /// Whole register or gate formal: `q`, `a0`.
    Id(Id),
    /// Indexed position: `q[0]`.
    Indexed(IndexedId),
}

impl From<&BitRef> for Argument {
    fn from(bit: &BitRef) -> Self {
        Argument::Indexed(IndexedId::new(bit.register(), bit.index()))
    }
}

impl From<Id> for Argument {
    fn from(id: Id) -> Self {
        Argument::Id(id)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Id(id) => write!(f, "{id}"),
            Argument::Indexed(IndexedId { id, index }) => write!(f, "{id}[{index}]"),
        }
    }
}

/// The grammar's built-in primitive calls.
///
/// Has no text form of its own; [`Statement`] renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UniversalUnitary {
    /// `U(θ,φ,λ) target`
    U {
        /// `θ,φ,λ`.
        params: Vec<Expression>,
        /// Target qubit.
        target: Argument,
    },
    /// `CX control,target`
    CX {
        /// Control qubit.
        control: Argument,
        /// Target qubit.
        target: Argument,
    },
}

/// A gate call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateCall {
    /// Gate name.
    pub name: Id,
    /// Gate parameters (angles, etc.).
    pub params: Vec<Expression>,
    /// Qubits the gate acts on.
    pub args: Vec<Argument>,
}

impl fmt::Display for GateCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.params.is_empty() {
            write!(f, "({})", join(&self.params))?;
        }
        write!(f, " {}", join(&self.args))
    }
}

/// A gate declaration: name, formal parameters, formal qubits and a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDecl {
    name: Id,
    params: Vec<Id>,
    qargs: Vec<Id>,
    body: Vec<Statement>,
}

impl GateDecl {
    /// Create a declaration with an empty body.
    pub fn new(name: impl Into<Id>, params: Vec<Id>, qargs: Vec<Id>) -> Self {
        Self {
            name: name.into(),
            params,
            qargs,
            body: vec![],
        }
    }

    /// Gate name.
    pub fn name(&self) -> &Id {
        &self.name
    }

    /// Formal parameters.
    pub fn params(&self) -> &[Id] {
        &self.params
    }

    /// Formal qubit arguments.
    pub fn qargs(&self) -> &[Id] {
        &self.qargs
    }

    /// Body statements in order.
    pub fn body(&self) -> &[Statement] {
        &self.body
    }

    /// Append one statement; chainable.
    pub fn append(&mut self, statement: Statement) -> &mut Self {
        self.body.push(statement);
        self
    }

    /// Append several statements in order; chainable.
    pub fn append_all(&mut self, statements: impl IntoIterator<Item = Statement>) -> &mut Self {
        self.body.extend(statements);
        self
    }

    /// A new declaration whose body is this body followed by `statement`.
    #[must_use]
    pub fn extended(&self, statement: Statement) -> GateDecl {
        let mut decl = self.clone();
        decl.body.push(statement);
        decl
    }

    /// Append `statement` in place.
    pub fn push(&mut self, statement: Statement) {
        self.body.push(statement);
    }
}

impl Add<Statement> for &GateDecl {
    type Output = GateDecl;

    fn add(self, statement: Statement) -> GateDecl {
        self.extended(statement)
    }
}

impl AddAssign<Statement> for GateDecl {
    fn add_assign(&mut self, statement: Statement) {
        self.push(statement);
    }
}

impl fmt::Display for GateDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gate {}", self.name)?;
        if !self.params.is_empty() {
            write!(f, "({})", join(&self.params))?;
        }
        write!(f, " {}\n{{", join(&self.qargs))?;
        for statement in &self.body {
            f.write_str("\n  ")?;
            write_terminated(f, statement)?;
        }
        f.write_str("\n}")
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Real literal.
    Real(f64),
    /// Integer literal.
    Int(i64),
    /// Pi constant.
    Pi,
    /// Identifier (a formal parameter).
    Id(Id),
    /// Negation.
    Neg(Box<Expression>),
    /// Binary operation.
    BinOp {
        /// Left operand.
        left: Box<Expression>,
        /// Operator.
        op: BinOp,
        /// Right operand.
        right: Box<Expression>,
    },
    /// Parenthesized expression.
    Paren(Box<Expression>),
}

impl Expression {
    /// Create a constant expression.
    pub fn constant(value: f64) -> Self {
        Expression::Real(value)
    }

    /// Try to evaluate as a constant f64.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Expression::Real(v) => Some(*v),
            Expression::Int(v) => Some(*v as f64),
            Expression::Pi => Some(std::f64::consts::PI),
            Expression::Id(_) => None,
            Expression::Neg(e) => e.as_f64().map(|v| -v),
            Expression::BinOp { left, op, right } => {
                let l = left.as_f64()?;
                let r = right.as_f64()?;
                Some(match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                })
            }
            Expression::Paren(e) => e.as_f64(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Real(v) => write!(f, "{v}"),
            Expression::Int(v) => write!(f, "{v}"),
            Expression::Pi => f.write_str("pi"),
            Expression::Id(id) => write!(f, "{id}"),
            Expression::Neg(e) => write!(f, "-({e})"),
            Expression::BinOp { left, op, right } => {
                left.fmt_operand(f)?;
                f.write_str(op.symbol())?;
                right.fmt_operand(f)
            }
            Expression::Paren(e) => write!(f, "({e})"),
        }
    }
}

impl Expression {
    /// Write as the operand of a binary operator, parenthesized unless atomic.
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grouped = match self {
            Expression::BinOp { .. } | Expression::Neg(_) => true,
            Expression::Real(v) => v.is_sign_negative(),
            Expression::Int(v) => *v < 0,
            Expression::Pi | Expression::Id(_) | Expression::Paren(_) => false,
        };
        if grouped {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^`
    Pow,
}

impl BinOp {
    /// Operator as written in text.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
        }
    }
}

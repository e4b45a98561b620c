use crate::config::{Config, EvaluatorKind};
use crate::error::PitfallError;
use crate::service::numeric::{BinaryOp, Number};
use evalexpr::{
    ContextWithMutableFunctions, ContextWithMutableVariables, EvalexprError, EvalexprResult,
    Function, HashMapContext, Node, Operator, Value as EvalValue,
};
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};

/// Evaluates the text of a `/calculate` request into a JSON value.
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate(&self, expression: &str) -> Result<Value, PitfallError>;
}

pub fn build_evaluator(cfg: &Config) -> Result<Arc<dyn ExpressionEvaluator>, PitfallError> {
    Ok(match cfg.evaluator {
        EvaluatorKind::Unsandboxed => Arc::new(UnsandboxedEvaluator::with_globals(cfg)?),
        EvaluatorKind::Arithmetic => Arc::new(ArithmeticEvaluator),
    })
}

/// General-purpose evaluator over one context shared by every caller.
///
/// Builtins are enabled, assignments persist between requests and the
/// process globals seeded at construction are readable by any expression.
/// `/` and `**` follow Python: true division and integer-preserving powers.
pub struct UnsandboxedEvaluator {
    context: Mutex<HashMapContext>,
}

const TRUE_DIV: &str = "ops::truediv";
const POWER: &str = "ops::pow";

impl UnsandboxedEvaluator {
    pub fn new() -> Result<Self, PitfallError> {
        Ok(Self {
            context: Mutex::new(numeric_context()?),
        })
    }

    pub fn with_globals(cfg: &Config) -> Result<Self, PitfallError> {
        let mut context = numeric_context()?;
        context.set_value("database_url".into(), cfg.database_url.clone().into())?;
        context.set_value("listen_addr".into(), cfg.listen_addr.clone().into())?;
        context.set_value("version".into(), crate::API_VERSION.into())?;
        Ok(Self {
            context: Mutex::new(context),
        })
    }
}

impl ExpressionEvaluator for UnsandboxedEvaluator {
    fn evaluate(&self, expression: &str) -> Result<Value, PitfallError> {
        let source = translate_operators(expression)?;
        let mut tree = evalexpr::build_operator_tree(&source)?;
        route_numeric_operators(&mut tree);

        let mut context = self.context.lock().unwrap_or_else(PoisonError::into_inner);
        let value = tree.eval_with_context_mut(&mut *context)?;
        Ok(eval_to_json(value))
    }
}

fn numeric_context() -> Result<HashMapContext, PitfallError> {
    let mut context = HashMapContext::new();
    context.set_function(TRUE_DIV.into(), numeric_function(BinaryOp::TrueDiv))?;
    context.set_function(POWER.into(), numeric_function(BinaryOp::Pow))?;
    Ok(context)
}

fn numeric_function(op: BinaryOp) -> Function {
    Function::new(move |argument| {
        let operands = argument.as_fixed_len_tuple(2)?;
        let lhs = to_number(&operands[0])?;
        let rhs = to_number(&operands[1])?;
        match lhs.apply(op, rhs) {
            Ok(Number::Int(i)) => Ok(EvalValue::Int(i)),
            Ok(Number::Float(f)) => Ok(EvalValue::Float(f)),
            Err(e) => Err(EvalexprError::CustomMessage(e.to_string())),
        }
    })
}

fn to_number(value: &EvalValue) -> EvalexprResult<Number> {
    match value {
        EvalValue::Int(i) => Ok(Number::Int(*i)),
        EvalValue::Float(f) => Ok(Number::Float(*f)),
        other => Err(EvalexprError::expected_number(other.clone())),
    }
}

/// Rewrite `**` to evalexpr's `^` outside string literals.
///
/// `//` would otherwise open a line comment and silently drop the divisor.
fn translate_operators(expression: &str) -> Result<String, PitfallError> {
    let mut out = String::with_capacity(expression.len());
    let mut chars = expression.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('*', Some('*')) => {
                chars.next();
                out.push('^');
            }
            ('/', Some('/')) => {
                return Err(PitfallError::Evaluation(
                    "floor division '//' is not supported; use floor(a / b)".into(),
                ));
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Replace `Div` and `Exp` nodes with calls to the numeric functions, so
/// `a / b` evaluates as `ops::truediv(a, b)`.
fn route_numeric_operators(node: &mut Node) {
    for child in node.children_mut().iter_mut() {
        route_numeric_operators(child);
    }

    let function = match node.operator() {
        Operator::Div => TRUE_DIV,
        Operator::Exp => POWER,
        _ => return,
    };
    let mut operands = node.clone();
    *operands.operator_mut() = Operator::Tuple;
    *node.operator_mut() = Operator::FunctionIdentifier {
        identifier: function.to_string(),
    };
    *node.children_mut() = vec![operands];
}

fn eval_to_json(value: EvalValue) -> Value {
    match value {
        EvalValue::String(s) => Value::String(s),
        EvalValue::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        EvalValue::Int(i) => Value::from(i),
        EvalValue::Boolean(b) => Value::Bool(b),
        EvalValue::Tuple(items) => Value::Array(items.into_iter().map(eval_to_json).collect()),
        EvalValue::Empty => Value::Null,
    }
}

/// Numeric literals, `+ - * / // % **`, unary signs and parentheses. Nothing else.
///
/// Operators follow Python: `/` always yields a float, `//` and `%` floor,
/// and `**` binds tighter than unary minus.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArithmeticEvaluator;

impl ExpressionEvaluator for ArithmeticEvaluator {
    fn evaluate(&self, expression: &str) -> Result<Value, PitfallError> {
        let mut parser = Parser::new(expression);
        let number = parser.parse()?;
        Ok(match number {
            Number::Int(i) => Value::from(i),
            Number::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| PitfallError::Evaluation("result is not finite".into()))?,
        })
    }
}

fn eval_error(msg: impl Into<String>) -> PitfallError {
    PitfallError::Evaluation(msg.into())
}

// expr  := term (('+' | '-') term)*
// term  := unary (('*' | '/' | '//' | '%') unary)*
// unary := ('+' | '-') unary | power
// power := atom ('**' unary)?
// atom  := number | '(' expr ')'
struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn parse(&mut self) -> Result<Number, PitfallError> {
        if self.peek().is_none() {
            return Err(eval_error("empty expression"));
        }
        let value = self.expr()?;
        match self.peek() {
            None => Ok(value),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn peek(&mut self) -> Option<u8> {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        bytes.get(self.pos).copied()
    }

    /// True when the byte right after the current one is `next`, with no gap.
    fn doubled(&self, next: u8) -> bool {
        self.src.as_bytes().get(self.pos + 1) == Some(&next)
    }

    fn unexpected(&self) -> PitfallError {
        match self.src[self.pos..].chars().next() {
            Some(c) => eval_error(format!("unexpected character '{c}' at position {}", self.pos)),
            None => eval_error("unexpected end of expression"),
        }
    }

    fn expr(&mut self) -> Result<Number, PitfallError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(b'+') => BinaryOp::Add,
                Some(b'-') => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = lhs.apply(op, rhs)?;
        }
    }

    fn term(&mut self) -> Result<Number, PitfallError> {
        let mut lhs = self.unary()?;
        loop {
            let (op, width) = match self.peek() {
                Some(b'*') if !self.doubled(b'*') => (BinaryOp::Mul, 1),
                Some(b'/') if self.doubled(b'/') => (BinaryOp::FloorDiv, 2),
                Some(b'/') => (BinaryOp::TrueDiv, 1),
                Some(b'%') => (BinaryOp::Mod, 1),
                _ => return Ok(lhs),
            };
            self.pos += width;
            let rhs = self.unary()?;
            lhs = lhs.apply(op, rhs)?;
        }
    }

    fn unary(&mut self) -> Result<Number, PitfallError> {
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                Ok(self.unary()?.neg()?)
            }
            Some(b'+') => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Number, PitfallError> {
        let base = self.atom()?;
        if self.peek() == Some(b'*') && self.doubled(b'*') {
            self.pos += 2;
            let exponent = self.unary()?;
            return Ok(base.apply(BinaryOp::Pow, exponent)?);
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Number, PitfallError> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let value = self.expr()?;
                match self.peek() {
                    Some(b')') => {
                        self.pos += 1;
                        Ok(value)
                    }
                    _ => Err(self.unexpected()),
                }
            }
            Some(c) if c.is_ascii_digit() || c == b'.' => self.number(),
            _ => Err(self.unexpected()),
        }
    }

    fn number(&mut self) -> Result<Number, PitfallError> {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        while self.pos < bytes.len() && (bytes[self.pos].is_ascii_digit() || bytes[self.pos] == b'.')
        {
            self.pos += 1;
        }
        let literal = &self.src[start..self.pos];
        if literal.contains('.') {
            literal
                .parse::<f64>()
                .map(Number::Float)
                .map_err(|_| eval_error(format!("invalid number '{literal}'")))
        } else {
            literal
                .parse::<i64>()
                .map(Number::Int)
                .map_err(|_| eval_error(format!("invalid number '{literal}'")))
        }
    }
}

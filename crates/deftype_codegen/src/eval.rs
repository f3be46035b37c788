//! Reference evaluator for generated declaration trees.
//!
//! Interprets constructors, operators, `Equals` and `GetHashCode` bodies
//! over a small dynamic value model, so the behavior of generated types can
//! be checked without a target toolchain. Instances are immutable; a
//! constructor builds its instance by persistent field updates.

use std::rc::Rc;

use deftype_foundation::{Error, Result};
use deftype_language::{Primitive, TypeRef};
use tracing::trace;

use crate::generator::OBJECT_TYPE;
use crate::tree::{
    BinaryOp, CompilationOutput, ElementComparison, Expr, GeneratedType, Method, OperatorKind,
    Stmt, TypeKind,
};

// =============================================================================
// Values
// =============================================================================

/// An instance of a generated class or struct.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    /// Qualified type name.
    pub type_name: String,
    /// Backing fields by name.
    pub fields: im::OrdMap<String, Value>,
}

/// A runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The null reference.
    Null,
    /// Boolean.
    Bool(bool),
    /// Any integral primitive.
    Int(i64),
    /// Any floating-point or decimal primitive.
    Float(f64),
    /// String.
    Str(String),
    /// One-dimensional array.
    Array(im::Vector<Value>),
    /// Instance of a generated type. Cloning shares the instance.
    Object(Rc<Instance>),
    /// Enumeration value.
    Enum {
        /// Qualified enum type name.
        type_name: String,
        /// Symbolic value.
        value: String,
    },
}

impl Value {
    /// Creates an array value.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Array(items.into_iter().collect())
    }

    /// Returns true for the null reference.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(Error::evaluation(format!("expected bool, found {other:?}"))),
        }
    }

    fn as_int(&self) -> Result<i64> {
        match self {
            Self::Int(i) => Ok(*i),
            other => Err(Error::evaluation(format!("expected integer, found {other:?}"))),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

// =============================================================================
// Evaluator
// =============================================================================

struct Frame {
    this: Value,
    locals: im::OrdMap<String, Value>,
}

impl Frame {
    fn new(this: Value) -> Self {
        Self {
            this,
            locals: im::OrdMap::new(),
        }
    }
}

/// Evaluates members of the types in one compilation output.
pub struct Evaluator<'a> {
    types: im::OrdMap<String, &'a GeneratedType>,
}

impl<'a> Evaluator<'a> {
    /// Indexes the types of `output`.
    #[must_use]
    pub fn new(output: &'a CompilationOutput) -> Self {
        Self {
            types: output.types().map(|t| (t.full_name(), t)).collect(),
        }
    }

    fn lookup(&self, type_name: &str) -> Result<&'a GeneratedType> {
        self.types
            .get(type_name)
            .copied()
            .ok_or_else(|| Error::evaluation(format!("unknown type {type_name}")))
    }

    /// Runs the constructor of `type_name` with `args`.
    ///
    /// # Errors
    /// Fails for unknown types, types without constructors, and arity mismatches.
    pub fn construct(&self, type_name: &str, args: Vec<Value>) -> Result<Value> {
        let ty = self.lookup(type_name)?;
        if !matches!(ty.kind, TypeKind::Class | TypeKind::Struct) {
            return Err(Error::evaluation(format!("{type_name} is not instantiable")));
        }
        let ctor = ty
            .constructor()
            .ok_or_else(|| Error::evaluation(format!("{type_name} has no constructor")))?;
        if ctor.params.len() != args.len() {
            return Err(Error::evaluation(format!(
                "{type_name} takes {} arguments, got {}",
                ctor.params.len(),
                args.len()
            )));
        }
        let mut frame = Frame::new(Value::Object(Rc::new(Instance {
            type_name: type_name.to_string(),
            fields: im::OrdMap::new(),
        })));
        for (param, arg) in ctor.params.iter().zip(args) {
            frame.locals.insert(param.name.clone(), arg);
        }
        self.exec(&ctor.body, &mut frame)?;
        trace!(type_name, "constructed instance");
        Ok(frame.this)
    }

    /// Returns the enum value `value` of `type_name`.
    ///
    /// # Errors
    /// Fails if the type is not an enum or has no such value.
    pub fn enum_value(&self, type_name: &str, value: &str) -> Result<Value> {
        let ty = self.lookup(type_name)?;
        if ty.kind != TypeKind::Enum || !ty.enum_values().any(|v| v.name == value) {
            return Err(Error::evaluation(format!("{type_name} has no value {value}")));
        }
        Ok(Value::Enum {
            type_name: type_name.to_string(),
            value: value.to_string(),
        })
    }

    /// Reads a property (or backing field) of an instance.
    ///
    /// # Errors
    /// Fails on null and on unknown members.
    pub fn get_property(&self, target: &Value, name: &str) -> Result<Value> {
        let Value::Object(instance) = target else {
            return Err(Error::evaluation(format!("cannot read {name} of {target:?}")));
        };
        if let Some(value) = instance.fields.get(name) {
            return Ok(value.clone());
        }
        let ty = self.lookup(&instance.type_name)?;
        let property = ty
            .properties()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::evaluation(format!("{} has no member {name}", instance.type_name)))?;
        self.eval(&property.getter, &Frame::new(target.clone()))
    }

    /// Calls `left.Equals(right)`, the typed overload of `left`'s type.
    ///
    /// # Errors
    /// Fails if `left` is not an instance.
    pub fn equals_typed(&self, left: &Value, right: &Value) -> Result<bool> {
        let Value::Object(instance) = left else {
            return Err(Error::evaluation("typed equality needs an instance receiver"));
        };
        self.invoke_equals(left, right, &TypeRef::named(&instance.type_name))
    }

    /// Calls `left.Equals((object) right)`.
    ///
    /// # Errors
    /// Fails if `left` is not an instance.
    pub fn equals_object(&self, left: &Value, right: &Value) -> Result<bool> {
        self.invoke_equals(left, right, &TypeRef::named(OBJECT_TYPE))
    }

    /// Applies the `==` operator declared by `type_name`.
    ///
    /// # Errors
    /// Fails if the type declares no such operator.
    pub fn op_equality(&self, type_name: &str, left: &Value, right: &Value) -> Result<bool> {
        self.operator(type_name, OperatorKind::Equality, left, right)
    }

    /// Applies the `!=` operator declared by `type_name`.
    ///
    /// # Errors
    /// Fails if the type declares no such operator.
    pub fn op_inequality(&self, type_name: &str, left: &Value, right: &Value) -> Result<bool> {
        self.operator(type_name, OperatorKind::Inequality, left, right)
    }

    /// Computes the hash code of a value.
    ///
    /// # Errors
    /// Fails for arrays, which have no structural hash.
    pub fn hash_code(&self, value: &Value) -> Result<i64> {
        match value {
            Value::Null => Ok(0),
            Value::Bool(b) => Ok(i64::from(*b)),
            Value::Int(i) => Ok(*i),
            Value::Float(f) => Ok(i64::from_ne_bytes(f.to_bits().to_ne_bytes())),
            Value::Str(s) => Ok(string_hash(s)),
            Value::Enum { value, .. } => Ok(string_hash(value)),
            Value::Array(_) => Err(Error::evaluation("arrays have no structural hash")),
            Value::Object(instance) => {
                let ty = self.lookup(&instance.type_name)?;
                let method = ty.methods("GetHashCode").next().ok_or_else(|| {
                    Error::evaluation(format!("{} has no GetHashCode", instance.type_name))
                })?;
                self.call(method, value.clone(), Vec::new())?.as_int()
            }
        }
    }

    // ===== Dispatch =====

    fn operator(&self, type_name: &str, kind: OperatorKind, left: &Value, right: &Value) -> Result<bool> {
        let ty = self.lookup(type_name)?;
        let op = ty.operator(kind).ok_or_else(|| {
            Error::evaluation(format!("{type_name} has no operator {}", kind.symbol()))
        })?;
        let mut frame = Frame::new(Value::Null);
        for (param, arg) in op.params.iter().zip([left, right]) {
            frame.locals.insert(param.name.clone(), arg.clone());
        }
        self.exec(&op.body, &mut frame)?
            .ok_or_else(|| Error::evaluation("operator returned nothing"))?
            .as_bool()
    }

    fn call(&self, method: &Method, this: Value, args: Vec<Value>) -> Result<Value> {
        let body = method
            .body
            .as_ref()
            .ok_or_else(|| Error::evaluation(format!("{} is abstract", method.name)))?;
        let mut frame = Frame::new(this);
        for (param, arg) in method.params.iter().zip(args) {
            frame.locals.insert(param.name.clone(), arg);
        }
        Ok(self.exec(body, &mut frame)?.unwrap_or(Value::Null))
    }

    fn invoke_equals(&self, target: &Value, arg: &Value, param_type: &TypeRef) -> Result<bool> {
        match target {
            Value::Null => Err(Error::evaluation("Equals called on null")),
            Value::Object(instance) => {
                let ty = self.lookup(&instance.type_name)?;
                let method = ty.method_with_param("Equals", param_type).ok_or_else(|| {
                    Error::evaluation(format!("{} has no Equals({param_type})", instance.type_name))
                })?;
                self.call(method, target.clone(), vec![arg.clone()])?.as_bool()
            }
            _ => value_equals(target, arg),
        }
    }

    fn null_safe_equals(&self, left: &Value, right: &Value) -> Result<bool> {
        match (left, right) {
            (Value::Null, Value::Null) => Ok(true),
            (Value::Null, _) | (_, Value::Null) => Ok(false),
            (Value::Object(instance), _) => {
                self.invoke_equals(left, right, &TypeRef::named(&instance.type_name))
            }
            _ => value_equals(left, right),
        }
    }

    // ===== Statements =====

    fn exec(&self, stmts: &[Stmt], frame: &mut Frame) -> Result<Option<Value>> {
        for stmt in stmts {
            match stmt {
                Stmt::Return(expr) => return self.eval(expr, frame).map(Some),
                Stmt::Assign { target, value } => {
                    let value = self.eval(value, frame)?;
                    assign(frame, target, value)?;
                }
                Stmt::If {
                    condition,
                    then,
                    otherwise,
                } => {
                    let branch = if self.eval(condition, frame)?.as_bool()? {
                        then
                    } else {
                        otherwise
                    };
                    if let Some(value) = self.exec(branch, frame)? {
                        return Ok(Some(value));
                    }
                }
            }
        }
        Ok(None)
    }

    // ===== Expressions =====

    fn eval(&self, expr: &Expr, frame: &Frame) -> Result<Value> {
        match expr {
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Int(i) => Ok(Value::Int(*i)),
            Expr::Null => Ok(Value::Null),
            Expr::This => Ok(frame.this.clone()),
            Expr::Ident(name) => frame
                .locals
                .get(name)
                .cloned()
                .ok_or_else(|| Error::evaluation(format!("unbound identifier {name}"))),
            Expr::Member(target, name) => {
                let target = self.eval(target, frame)?;
                self.get_property(&target, name)
            }
            Expr::Not(inner) => Ok(Value::Bool(!self.eval(inner, frame)?.as_bool()?)),
            Expr::Binary { op, left, right } => self.binary(*op, left, right, frame),
            Expr::IsNull(inner) => Ok(Value::Bool(self.eval(inner, frame)?.is_null())),
            Expr::NullSafeEquals(left, right) => {
                let left = self.eval(left, frame)?;
                let right = self.eval(right, frame)?;
                self.null_safe_equals(&left, &right).map(Value::Bool)
            }
            Expr::InvokeEquals {
                target,
                arg,
                param_type,
            } => {
                let target = self.eval(target, frame)?;
                let arg = self.eval(arg, frame)?;
                self.invoke_equals(&target, &arg, param_type).map(Value::Bool)
            }
            Expr::HashCode(inner) => {
                let value = self.eval(inner, frame)?;
                self.hash_code(&value).map(Value::Int)
            }
            Expr::Length(inner) => match self.eval(inner, frame)? {
                Value::Array(items) => i64::try_from(items.len())
                    .map(Value::Int)
                    .map_err(|_| Error::evaluation("array too long")),
                other => Err(Error::evaluation(format!("length of {other:?}"))),
            },
            Expr::ElementwiseEquals {
                left,
                right,
                element,
            } => {
                let (Value::Array(left), Value::Array(right)) =
                    (self.eval(left, frame)?, self.eval(right, frame)?)
                else {
                    return Err(Error::evaluation("element-wise equality needs two arrays"));
                };
                if left.len() != right.len() {
                    return Ok(Value::Bool(false));
                }
                for (l, r) in left.iter().zip(right.iter()) {
                    let equal = match element {
                        ElementComparison::Value => value_equals(l, r)?,
                        ElementComparison::NullSafe => self.null_safe_equals(l, r)?,
                    };
                    if !equal {
                        return Ok(Value::Bool(false));
                    }
                }
                Ok(Value::Bool(true))
            }
            Expr::IsType(inner, ty) => {
                let value = self.eval(inner, frame)?;
                Ok(Value::Bool(is_instance_of(&value, ty)))
            }
            Expr::Cast(inner, ty) => {
                let value = self.eval(inner, frame)?;
                if value.is_null() || is_instance_of(&value, ty) {
                    Ok(value)
                } else {
                    Err(Error::evaluation(format!("invalid cast of {value:?} to {ty}")))
                }
            }
        }
    }

    fn binary(&self, op: BinaryOp, left: &Expr, right: &Expr, frame: &Frame) -> Result<Value> {
        match op {
            BinaryOp::And => Ok(Value::Bool(
                self.eval(left, frame)?.as_bool()? && self.eval(right, frame)?.as_bool()?,
            )),
            BinaryOp::Or => Ok(Value::Bool(
                self.eval(left, frame)?.as_bool()? || self.eval(right, frame)?.as_bool()?,
            )),
            BinaryOp::Eq | BinaryOp::Ne => {
                let equal = value_equals(&self.eval(left, frame)?, &self.eval(right, frame)?)?;
                Ok(Value::Bool(equal == (op == BinaryOp::Eq)))
            }
            BinaryOp::Add => {
                let sum = self
                    .eval(left, frame)?
                    .as_int()?
                    .wrapping_add(self.eval(right, frame)?.as_int()?);
                Ok(Value::Int(sum))
            }
        }
    }
}

fn assign(frame: &mut Frame, target: &Expr, value: Value) -> Result<()> {
    let Expr::Member(owner, field) = target else {
        return Err(Error::evaluation(format!("cannot assign to {target:?}")));
    };
    if **owner != Expr::This {
        return Err(Error::evaluation("only fields of this can be assigned"));
    }
    let Value::Object(instance) = &frame.this else {
        return Err(Error::evaluation("assignment outside an instance"));
    };
    frame.this = Value::Object(Rc::new(Instance {
        type_name: instance.type_name.clone(),
        fields: instance.fields.update(field.clone(), value),
    }));
    Ok(())
}

/// Direct value equality; instances compare by identity.
fn value_equals(left: &Value, right: &Value) -> Result<bool> {
    match (left, right) {
        (Value::Array(_), _) | (_, Value::Array(_)) => {
            Err(Error::evaluation("arrays have no direct value equality"))
        }
        (Value::Object(a), Value::Object(b)) => Ok(Rc::ptr_eq(a, b)),
        _ => Ok(left == right),
    }
}

fn is_instance_of(value: &Value, ty: &TypeRef) -> bool {
    match (value, ty) {
        (Value::Null, _) => false,
        (_, TypeRef::Named(name)) if name.full_name() == OBJECT_TYPE => true,
        (Value::Object(instance), TypeRef::Named(name)) => instance.type_name == name.full_name(),
        (Value::Enum { type_name, .. }, TypeRef::Named(name)) => *type_name == name.full_name(),
        (Value::Str(_), TypeRef::String) | (Value::Array(_), TypeRef::Array { .. }) => true,
        (Value::Bool(_), TypeRef::Simple(p) | TypeRef::Nullable(p)) => *p == Primitive::Bool,
        (Value::Float(_), TypeRef::Simple(p) | TypeRef::Nullable(p)) => {
            matches!(p, Primitive::Float | Primitive::Double | Primitive::Decimal)
        }
        (Value::Int(_), TypeRef::Simple(p) | TypeRef::Nullable(p)) => !matches!(
            p,
            Primitive::Bool | Primitive::Float | Primitive::Double | Primitive::Decimal
        ),
        _ => false,
    }
}

fn string_hash(s: &str) -> i64 {
    s.chars()
        .fold(17i64, |h, c| h.wrapping_mul(31).wrapping_add(i64::from(u32::from(c))))
}

//! Conversion of any `T: Serialize` into a `Value`.

use super::{Map, RawExpression, Value};
use crate::error::{Error, Path, Result};
use crate::number::Number;
use serde::ser::{self, Impossible, Serialize, Serializer as _};

// Newtype struct name used to smuggle a `RawExpression` through serde without quoting it.
pub(crate) const RAW_EXPRESSION_NAME: &str = "$terraforge::RawExpression";

/// Converts `value` into a `Value`.
///
/// Structs and maps become objects (keeping field order), sequences and tuples become arrays,
/// `None` and unit become `Null`. Enum variants are represented like `serde_json` does.
///
/// ## Errors
///
/// Returns `Error::UnsupportedValue` for kinds outside the value grammar, such as byte strings or
/// maps with non-string keys. The error path points to the offending value.
///
/// ## Example
///
/// ```
/// use serde::Serialize;
/// use terraforge::{to_value, Value};
///
/// #[derive(Serialize)]
/// struct Ingress {
///     from_port: u16,
///     cidr_blocks: Vec<&'static str>,
/// }
///
/// let value = to_value(&Ingress { from_port: 443, cidr_blocks: vec!["0.0.0.0/0"] })?;
///
/// assert_eq!(
///     value,
///     Value::from_iter([
///         ("from_port", Value::from(443)),
///         ("cidr_blocks", Value::from(vec!["0.0.0.0/0"])),
///     ])
/// );
/// # Ok::<(), terraforge::Error>(())
/// ```
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

fn unsupported(kind: &str) -> Error {
    Error::unsupported(Path::new(), kind)
}

impl Serialize for RawExpression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_newtype_struct(RAW_EXPRESSION_NAME, self.as_str())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Int(int)) => serializer.serialize_i64(*int),
            Value::Number(Number::UInt(uint)) => serializer.serialize_u64(*uint),
            Value::Number(Number::Float(float)) => serializer.serialize_f64(*float),
            Value::String(s) => serializer.serialize_str(s),
            Value::Raw(expr) => expr.serialize(serializer),
            Value::Array(array) => serializer.collect_seq(array),
            Value::Object(object) => serializer.collect_map(object),
        }
    }
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Value> {
        Err(unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        if name == RAW_EXPRESSION_NAME {
            return value.serialize(RawExpressionSerializer);
        }

        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let value = to_value(value).map_err(|err| err.within(variant))?;
        Ok(Value::from_iter([(variant, value)]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(SerializeMap {
            map: Map::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            map: Map::with_capacity(len),
        })
    }
}

struct SerializeVec {
    vec: Vec<Value>,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let index = self.vec.len();
        self.vec
            .push(to_value(value).map_err(|err| err.within(index))?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

struct SerializeTupleVariant {
    variant: &'static str,
    vec: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let index = self.vec.len();
        let value = to_value(value).map_err(|err| err.within(index).within(self.variant))?;
        self.vec.push(value);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::from_iter([(self.variant, Value::Array(self.vec))]))
    }
}

struct SerializeMap {
    map: Map<String, Value>,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::new("serialize_value called before serialize_key"))?;
        let value = to_value(value).map_err(|err| err.within(key.as_str()))?;
        self.map.insert(key, value);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = to_value(value).map_err(|err| err.within(key))?;
        self.map.insert(key.to_owned(), value);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        ser::SerializeMap::end(self)
    }
}

struct SerializeStructVariant {
    variant: &'static str,
    map: Map<String, Value>,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = to_value(value).map_err(|err| err.within(key).within(self.variant))?;
        self.map.insert(key.to_owned(), value);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::from_iter([(self.variant, Value::Object(self.map))]))
    }
}

/// Only accepts strings and chars as object keys.
struct MapKeySerializer;

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_owned())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_i8(self, _v: i8) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_i16(self, _v: i16) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_i32(self, _v: i32) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_i64(self, _v: i64) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_u8(self, _v: u8) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_u16(self, _v: u16) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_u32(self, _v: u32) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_u64(self, _v: u64) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_none(self) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(unsupported("non-string map key"))
    }

    fn serialize_unit(self) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(unsupported("non-string map key"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(unsupported("non-string map key"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(unsupported("non-string map key"))
    }
}

/// Accepts only the `&str` wrapped by a serialized `RawExpression`.
struct RawExpressionSerializer;

impl ser::Serializer for RawExpressionSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = Impossible<Value, Error>;
    type SerializeTuple = Impossible<Value, Error>;
    type SerializeTupleStruct = Impossible<Value, Error>;
    type SerializeTupleVariant = Impossible<Value, Error>;
    type SerializeMap = Impossible<Value, Error>;
    type SerializeStruct = Impossible<Value, Error>;
    type SerializeStructVariant = Impossible<Value, Error>;

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::Raw(RawExpression::new(v)))
    }

    fn serialize_bool(self, _v: bool) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_i8(self, _v: i8) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_i16(self, _v: i16) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_i32(self, _v: i32) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_i64(self, _v: i64) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_u8(self, _v: u8) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_u16(self, _v: u16) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_u32(self, _v: u32) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_u64(self, _v: u64) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_f32(self, _v: f32) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::Raw(RawExpression::new(v)))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_none(self) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Err(unsupported("raw expression"))
    }

    fn serialize_unit(self) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Value> {
        Err(unsupported("raw expression"))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, _value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Err(unsupported("raw expression"))
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Err(unsupported("raw expression"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(unsupported("raw expression"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(unsupported("raw expression"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(unsupported("raw expression"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(unsupported("raw expression"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(unsupported("raw expression"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(unsupported("raw expression"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(unsupported("raw expression"))
    }
}

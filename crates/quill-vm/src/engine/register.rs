//! Registers and the register bank.
//!
//! A register is a double-ended sequence of values. The front is the "top"
//! used by every stack-discipline operation; the back is only reached by
//! the two rotation operations. Operations whose size precondition fails
//! leave the register untouched.

use std::collections::VecDeque;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use quill_bytecode::RegisterId;

use super::value::Value;

/// A double-ended value sequence with no fixed capacity.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Register(VecDeque<Value>);

impl Register {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn push_front(&mut self, value: Value) {
        self.0.push_front(value);
    }

    #[inline]
    pub fn pop_front(&mut self) -> Option<Value> {
        self.0.pop_front()
    }

    #[inline]
    pub fn front(&self) -> Option<Value> {
        self.0.front().copied()
    }

    #[inline]
    pub fn push_back(&mut self, value: Value) {
        self.0.push_back(value);
    }

    #[inline]
    pub fn pop_back(&mut self) -> Option<Value> {
        self.0.pop_back()
    }

    #[inline]
    pub fn back(&self) -> Option<Value> {
        self.0.back().copied()
    }

    /// Values from front to back.
    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        self.0.iter().copied()
    }

    /// Duplicate the front value.
    pub fn dup(&mut self) -> bool {
        let Some(top) = self.front() else {
            return false;
        };
        self.push_front(top);
        true
    }

    /// Exchange the two front values.
    pub fn swap(&mut self) -> bool {
        if self.len() < 2 {
            return false;
        }
        self.0.swap(0, 1);
        true
    }

    /// Move the back value to the front.
    pub fn rotate_to_front(&mut self) -> bool {
        let Some(value) = self.pop_back() else {
            return false;
        };
        self.push_front(value);
        true
    }

    /// Move the front value to the back.
    pub fn rotate_to_back(&mut self) -> bool {
        let Some(value) = self.pop_front() else {
            return false;
        };
        self.push_back(value);
        true
    }

    /// Pop the two front values as `(a, b)` where `b` was on top.
    ///
    /// Returns `None`, popping nothing, when fewer than two values are held.
    pub fn pop_pair(&mut self) -> Option<(Value, Value)> {
        if self.len() < 2 {
            return None;
        }
        let b = self.pop_front()?;
        let a = self.pop_front()?;
        Some((a, b))
    }
}

impl FromIterator<Value> for Register {
    /// Collect values front first.
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The 26 registers addressed `a` through `z`.
///
/// Owned by the VM; callers always pass the register to operate on
/// explicitly, the active selection lives in the VM.
#[derive(Clone, Debug, PartialEq)]
pub struct RegisterBank {
    registers: [Register; RegisterId::COUNT],
}

impl RegisterBank {
    pub fn new() -> Self {
        Self {
            registers: std::array::from_fn(|_| Register::new()),
        }
    }

    #[inline]
    pub fn get(&self, id: RegisterId) -> &Register {
        &self.registers[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: RegisterId) -> &mut Register {
        &mut self.registers[id.index()]
    }

    /// Move the front value of `from` onto the front of `to`.
    ///
    /// No-op when `from` is empty.
    pub fn transfer(&mut self, from: RegisterId, to: RegisterId) -> bool {
        let Some(value) = self.get_mut(from).pop_front() else {
            return false;
        };
        self.get_mut(to).push_front(value);
        true
    }

    /// All registers in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (RegisterId, &Register)> {
        RegisterId::all().zip(self.registers.iter())
    }

    /// Registers holding at least one value.
    pub fn non_empty(&self) -> impl Iterator<Item = (RegisterId, &Register)> {
        self.iter().filter(|(_, r)| !r.is_empty())
    }

    /// Empty every register.
    pub fn clear(&mut self) {
        for register in &mut self.registers {
            *register = Register::new();
        }
    }
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for RegisterBank {
    /// Serialized as a map from letter to values, skipping empty registers.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for (id, register) in self.non_empty() {
            map.serialize_entry(&id.to_string(), register)?;
        }
        map.end()
    }
}

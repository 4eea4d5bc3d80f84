//! Quantum and classical registers and the bit references they hand out.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Whether a register holds qubits or classical bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegisterKind {
    /// Quantum register (`qreg`).
    Quantum,
    /// Classical register (`creg`).
    Classical,
}

impl RegisterKind {
    /// Declaration keyword used in QASM text.
    pub fn keyword(self) -> &'static str {
        match self {
            RegisterKind::Quantum => "qreg",
            RegisterKind::Classical => "creg",
        }
    }
}

/// One addressable position: a register name and an index into it.
///
/// Equality is by `(register, index)`. A `BitRef` may name an index that is
/// out of range; the owning circuit rejects it on attachment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitRef {
    register: String,
    index: u32,
}

impl BitRef {
    /// Create a reference to `register[index]`.
    pub fn new(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index,
        }
    }

    /// Name of the register.
    pub fn register(&self) -> &str {
        &self.register
    }

    /// Position within the register.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for BitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}

/// A named, sized register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    name: String,
    kind: RegisterKind,
    size: u32,
}

impl Register {
    /// Create a register, checking the name and size.
    pub fn new(name: impl Into<String>, kind: RegisterKind, size: u32) -> IrResult<Self> {
        let name = name.into();
        if size == 0 {
            return Err(IrError::InvalidRegister {
                name,
                reason: "size must be positive".into(),
            });
        }
        if !is_identifier(&name) {
            return Err(IrError::InvalidRegister {
                reason: "name must match [a-z][A-Za-z0-9_]*".into(),
                name,
            });
        }
        Ok(Self { name, kind, size })
    }

    /// Create a quantum register.
    pub fn quantum(name: impl Into<String>, size: u32) -> IrResult<Self> {
        Self::new(name, RegisterKind::Quantum, size)
    }

    /// Create a classical register.
    pub fn classical(name: impl Into<String>, size: u32) -> IrResult<Self> {
        Self::new(name, RegisterKind::Classical, size)
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quantum or classical.
    pub fn kind(&self) -> RegisterKind {
        self.kind
    }

    /// Number of positions.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether this is a quantum register.
    pub fn is_quantum(&self) -> bool {
        self.kind == RegisterKind::Quantum
    }

    /// Reference to position `index`.
    pub fn bit(&self, index: u32) -> IrResult<BitRef> {
        if index >= self.size {
            return Err(IrError::IndexOutOfRange {
                register: self.name.clone(),
                index,
                size: self.size,
            });
        }
        Ok(BitRef::new(&self.name, index))
    }

    /// All positions in ascending index order.
    pub fn bits(&self) -> impl Iterator<Item = BitRef> + '_ {
        (0..self.size).map(move |i| BitRef::new(&self.name, i))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}[{}]", self.kind.keyword(), self.name, self.size)
    }
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Ordered set of registers owned by one circuit.
#[derive(Debug, Clone, Default)]
pub struct RegisterTable {
    registers: Vec<Register>,
    by_name: FxHashMap<String, usize>,
}

impl RegisterTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a register; names are unique across both kinds.
    pub fn insert(&mut self, register: Register) -> IrResult<()> {
        if self.by_name.contains_key(register.name()) {
            return Err(IrError::DuplicateRegister(register.name().to_string()));
        }
        self.by_name
            .insert(register.name().to_string(), self.registers.len());
        self.registers.push(register);
        Ok(())
    }

    /// Look up a register by name.
    pub fn get(&self, name: &str) -> Option<&Register> {
        self.by_name.get(name).map(|&i| &self.registers[i])
    }

    /// Whether exactly this register (name, kind and size) is owned.
    pub fn contains(&self, register: &Register) -> bool {
        self.get(register.name()) == Some(register)
    }

    /// Registers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Register> {
        self.registers.iter()
    }

    /// Number of registers.
    pub fn len(&self) -> usize {
        self.registers.len()
    }

    /// Check if the table has no registers.
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// Total number of qubits across quantum registers.
    pub fn num_qubits(&self) -> usize {
        self.sum_sizes(RegisterKind::Quantum)
    }

    /// Total number of classical bits across classical registers.
    pub fn num_clbits(&self) -> usize {
        self.sum_sizes(RegisterKind::Classical)
    }

    fn sum_sizes(&self, kind: RegisterKind) -> usize {
        self.registers
            .iter()
            .filter(|r| r.kind() == kind)
            .map(|r| r.size() as usize)
            .sum()
    }

    /// Fail unless `qubit` resolves to a quantum register position.
    pub fn check_qubit(&self, qubit: &BitRef) -> IrResult<()> {
        match self.get(qubit.register()) {
            Some(reg) if reg.is_quantum() => {
                if qubit.index() >= reg.size() {
                    return Err(IrError::IndexOutOfRange {
                        register: reg.name().to_string(),
                        index: qubit.index(),
                        size: reg.size(),
                    });
                }
                Ok(())
            }
            _ => Err(IrError::QubitNotInCircuit {
                qubit: qubit.clone(),
                gate_name: None,
            }),
        }
    }

    /// Fail unless this quantum register is owned.
    pub fn check_qreg(&self, register: &Register) -> IrResult<()> {
        if register.is_quantum() && self.contains(register) {
            Ok(())
        } else {
            Err(IrError::RegisterNotInCircuit(register.name().to_string()))
        }
    }

    /// Fail unless this classical register is owned.
    pub fn check_creg(&self, register: &Register) -> IrResult<()> {
        if !register.is_quantum() && self.contains(register) {
            Ok(())
        } else {
            Err(IrError::RegisterNotInCircuit(register.name().to_string()))
        }
    }

    /// Resolve a classical register by name, as a condition refers to it.
    pub fn classical(&self, name: &str) -> IrResult<&Register> {
        match self.get(name) {
            Some(reg) if !reg.is_quantum() => Ok(reg),
            _ => Err(IrError::RegisterNotInCircuit(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_display() {
        let q = Register::quantum("q", 2).unwrap();
        assert_eq!(q.bit(1).unwrap().to_string(), "q[1]");
        assert_eq!(q.to_string(), "qreg q[2]");
    }

    #[test]
    fn test_bit_out_of_range() {
        let q = Register::quantum("q", 3).unwrap();
        assert!(matches!(
            q.bit(3),
            Err(IrError::IndexOutOfRange { index: 3, size: 3, .. })
        ));
    }

    #[test]
    fn test_bits_ascending() {
        let c = Register::classical("c", 3).unwrap();
        let idx: Vec<_> = c.bits().map(|b| b.index()).collect();
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    fn test_invalid_registers() {
        assert!(Register::quantum("q", 0).is_err());
        assert!(Register::quantum("Q", 1).is_err());
        assert!(Register::quantum("1q", 1).is_err());
        assert!(Register::quantum("anc_0", 1).is_ok());
    }

    #[test]
    fn test_table_rejects_duplicates_across_kinds() {
        let mut table = RegisterTable::new();
        table.insert(Register::quantum("r", 2).unwrap()).unwrap();
        let err = table.insert(Register::classical("r", 2).unwrap());
        assert!(matches!(err, Err(IrError::DuplicateRegister(name)) if name == "r"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_check_qubit() {
        let mut table = RegisterTable::new();
        table.insert(Register::quantum("q", 3).unwrap()).unwrap();
        table.insert(Register::classical("c", 1).unwrap()).unwrap();

        assert!(table.check_qubit(&BitRef::new("q", 2)).is_ok());
        assert!(matches!(
            table.check_qubit(&BitRef::new("q", 5)),
            Err(IrError::IndexOutOfRange { index: 5, size: 3, .. })
        ));
        assert!(matches!(
            table.check_qubit(&BitRef::new("c", 0)),
            Err(IrError::QubitNotInCircuit { .. })
        ));
        assert!(matches!(
            table.check_qubit(&BitRef::new("r", 0)),
            Err(IrError::QubitNotInCircuit { .. })
        ));
    }

    #[test]
    fn test_contains_compares_size() {
        let mut table = RegisterTable::new();
        table.insert(Register::quantum("q", 3).unwrap()).unwrap();
        assert!(table.contains(&Register::quantum("q", 3).unwrap()));
        assert!(!table.contains(&Register::quantum("q", 2).unwrap()));
        assert_eq!(table.num_qubits(), 3);
        assert_eq!(table.num_clbits(), 0);
    }
}

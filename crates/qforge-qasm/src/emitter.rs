//! QASM emitter for serializing circuits.

use qforge_ir::{
    BitRef, Circuit, ClassicalCondition, Instruction, InstructionKind, QELIB1_GATES, StandardGate,
};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use crate::ast::{
    Argument, Expression, GateCall, GateDecl, Id, Include, Program, RegisterDecl, Statement,
    UniversalUnitary,
};
use crate::error::{EmitError, EmitResult};
use crate::options::{CompositeStyle, EmitOptions};

/// Emit a circuit as `OpenQASM` 2.0 source code with default options.
pub fn emit(circuit: &Circuit) -> EmitResult<String> {
    emit_with(circuit, &EmitOptions::default())
}

/// Emit a circuit as QASM source code.
#[instrument(skip(circuit, options), fields(circuit = circuit.name()))]
pub fn emit_with(circuit: &Circuit, options: &EmitOptions) -> EmitResult<String> {
    let program = to_program(circuit, options)?;
    Ok(program.to_string())
}

/// Lower a circuit into a [`Program`].
///
/// Statement order: includes, gate declarations, register declarations,
/// then the instructions in program order.
pub fn to_program(circuit: &Circuit, options: &EmitOptions) -> EmitResult<Program> {
    options.validate()?;
    let mut emitter = Emitter::new(options);
    emitter.emit_circuit(circuit)
}

/// Declaration of a composite instruction as a `gate`.
///
/// Formal qubits are named `a0..` (controls first), formal parameters
/// `p0..`; body angles equal to a parameter value, or its negation, are
/// written with the formal name. The name carries one `c` per control and a
/// `_dg` suffix when the body is inverted. Nested composites are called by
/// name.
pub fn declare(instruction: &Instruction) -> EmitResult<GateDecl> {
    let options = EmitOptions::default().with_composites(CompositeStyle::Declare);
    Emitter::new(&options).declaration(instruction)
}

/// Where lowered statements are placed.
#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
    /// Top level: concrete positions, guards rendered per statement.
    Program,
    /// Inside a declaration: formal names, the guard is carried by the call.
    Declaration {
        gate: &'a str,
        formals: &'a [BitRef],
        params: &'a [f64],
        guard: Option<&'a ClassicalCondition>,
    },
}

impl Scope<'_> {
    fn argument(&self, bit: &BitRef) -> EmitResult<Argument> {
        match self {
            Scope::Program => Ok(Argument::from(bit)),
            Scope::Declaration { gate, formals, .. } => formals
                .iter()
                .position(|formal| formal == bit)
                .map(|i| Argument::Id(formal_qubit(i)))
                .ok_or_else(|| {
                    EmitError::unsupported(*gate, format!("{bit} is not a formal argument"))
                }),
        }
    }

    /// A parameter value; inside a declaration, values equal to a gate
    /// parameter or its negation are written with the formal name.
    fn param(&self, value: f64) -> Expression {
        if let Scope::Declaration { params, .. } = self {
            if let Some(i) = params.iter().position(|&p| p == value) {
                return Expression::Id(formal_param(i));
            }
            if let Some(i) = params.iter().position(|&p| p != 0.0 && p == -value) {
                return Expression::Neg(Box::new(Expression::Id(formal_param(i))));
            }
        }
        Expression::Real(value)
    }

    fn params(&self, values: &[f64]) -> Vec<Expression> {
        values.iter().map(|&v| self.param(v)).collect()
    }

    fn arguments<'b>(&self, bits: impl Iterator<Item = &'b BitRef>) -> EmitResult<Vec<Argument>> {
        bits.map(|bit| self.argument(bit)).collect()
    }

    fn guard(&self, statement: Statement, instruction: &Instruction) -> EmitResult<Statement> {
        match self {
            Scope::Program => Ok(match instruction.condition() {
                Some(cond) => statement.guarded(cond.register.as_str(), cond.value),
                None => statement,
            }),
            Scope::Declaration { gate, guard, .. } => {
                if instruction.condition() == *guard {
                    Ok(statement)
                } else {
                    Err(EmitError::unsupported(
                        *gate,
                        format!(
                            "body element '{}' has a condition the gate does not",
                            instruction.name()
                        ),
                    ))
                }
            }
        }
    }
}

fn formal_qubit(index: usize) -> Id {
    Id::new(format!("a{index}"))
}

fn formal_param(index: usize) -> Id {
    Id::new(format!("p{index}"))
}

/// QASM emitter.
struct Emitter<'o> {
    options: &'o EmitOptions,
    declarations: Vec<GateDecl>,
    by_name: FxHashMap<String, usize>,
}

impl<'o> Emitter<'o> {
    fn new(options: &'o EmitOptions) -> Self {
        Self {
            options,
            declarations: vec![],
            by_name: FxHashMap::default(),
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) -> EmitResult<Program> {
        let mut body = vec![];
        for instruction in circuit.instructions() {
            self.emit_instruction(instruction, Scope::Program, &mut body)?;
        }

        let mut program = Program::new(self.options.version.as_str());

        // Includes
        for path in &self.options.includes {
            program.push(Statement::Include(Include::new(path.as_str())));
        }

        // Gate declarations, dependencies first
        let declared = self.declarations.len();
        for decl in self.declarations.drain(..) {
            program.push(Statement::GateDecl(decl));
        }

        // Register declarations
        for register in circuit.registers().iter() {
            program.push(Statement::RegisterDecl(RegisterDecl {
                kind: register.kind(),
                name: Id::new(register.name()),
                size: register.size(),
            }));
        }

        program.statements.extend(body);
        debug!(
            statements = program.statements.len(),
            declared, "lowered circuit"
        );
        Ok(program)
    }

    fn emit_instruction(
        &mut self,
        instruction: &Instruction,
        scope: Scope<'_>,
        out: &mut Vec<Statement>,
    ) -> EmitResult<()> {
        match instruction.kind() {
            InstructionKind::Gate(gate) => {
                let statement = self.emit_gate(gate, instruction, scope)?;
                out.push(scope.guard(statement, instruction)?);
            }

            InstructionKind::Barrier => {
                let args = scope.arguments(instruction.qubits().iter())?;
                out.push(Statement::Barrier(args));
            }

            InstructionKind::Composite(composite) => match self.options.composites {
                CompositeStyle::Inline => {
                    for element in composite.body() {
                        self.emit_instruction(element, scope, out)?;
                    }
                }
                CompositeStyle::Declare => {
                    let name = self.declare_composite(instruction)?;
                    let call = GateCall {
                        name: Id::new(name),
                        params: scope.params(composite.params()),
                        args: scope.arguments(instruction.operands())?,
                    };
                    out.push(scope.guard(Statement::GateCall(call), instruction)?);
                }
            },
        }

        Ok(())
    }

    fn emit_gate(
        &self,
        gate: &StandardGate,
        instruction: &Instruction,
        scope: Scope<'_>,
    ) -> EmitResult<Statement> {
        let args = scope.arguments(instruction.operands())?;
        let name = instruction.qasm_name();
        if !instruction.controls().is_empty() && !QELIB1_GATES.contains(&name.as_str()) {
            return Err(EmitError::unsupported(
                name,
                "controlled form is not defined by qelib1.inc",
            ));
        }

        if self.options.primitives && instruction.controls().is_empty() {
            match (gate, args.as_slice()) {
                (StandardGate::U3(theta, phi, lambda), [target]) => {
                    return Ok(Statement::UniversalUnitary(UniversalUnitary::U {
                        params: scope.params(&[*theta, *phi, *lambda]),
                        target: target.clone(),
                    }));
                }
                (StandardGate::CX, [control, target]) => {
                    return Ok(Statement::UniversalUnitary(UniversalUnitary::CX {
                        control: control.clone(),
                        target: target.clone(),
                    }));
                }
                _ => {}
            }
        }

        Ok(Statement::GateCall(GateCall {
            name: Id::new(name),
            params: scope.params(&gate.parameters()),
            args,
        }))
    }

    /// Record the declaration of `instruction` once and return its name.
    fn declare_composite(&mut self, instruction: &Instruction) -> EmitResult<String> {
        let decl = self.declaration(instruction)?;
        let name = decl.name().as_str().to_string();
        match self.by_name.get(&name) {
            Some(&i) if self.declarations[i] == decl => {}
            Some(_) => {
                return Err(EmitError::unsupported(
                    name,
                    "two different definitions share this name",
                ));
            }
            None => {
                debug!(gate = %name, body = decl.body().len(), "declared composite gate");
                self.by_name.insert(name.clone(), self.declarations.len());
                self.declarations.push(decl);
            }
        }
        Ok(name)
    }

    fn declaration(&mut self, instruction: &Instruction) -> EmitResult<GateDecl> {
        let Some(composite) = instruction.as_composite() else {
            return Err(EmitError::unsupported(
                instruction.name(),
                "only composite gates can be declared",
            ));
        };

        let formals: Vec<BitRef> = instruction.operands().cloned().collect();
        let params = (0..composite.params().len()).map(formal_param).collect();
        let qargs = (0..formals.len()).map(formal_qubit).collect();
        let suffix = if composite.is_inverted() { "_dg" } else { "" };
        let mut decl = GateDecl::new(
            format!("{}{suffix}", instruction.qasm_name()),
            params,
            qargs,
        );

        let scope = Scope::Declaration {
            gate: composite.name(),
            formals: &formals,
            params: composite.params(),
            guard: instruction.condition(),
        };
        let mut body = vec![];
        for element in composite.body() {
            self.emit_instruction(element, scope, &mut body)?;
        }
        decl.append_all(body);
        Ok(decl)
    }
}

//! Unit tests for bytecode_system

mod test_compiler;
mod test_optimizer;
mod test_program;

//! 음운 변화 규칙 컴파일러와 인터프리터

pub mod category;
pub mod compiler;
pub mod engine;
pub mod interpreter;
pub mod matcher;
pub mod token;
pub mod tokenizer;

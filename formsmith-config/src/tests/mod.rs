//! Source precedence and file format tests

mod precedence;

//! Input readers - parse source code into IR.

#[cfg(feature = "read-python")]
pub mod python;

#[cfg(feature = "read-python")]
pub use python::{
    PYTHON_READER, PythonReader, read_python, read_python_function, read_python_members,
};

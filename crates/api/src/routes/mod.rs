pub mod transcribe;

//! Integration tests for the logger factory.

//! Scenario tests across the whole engine.

mod grammars_tests;

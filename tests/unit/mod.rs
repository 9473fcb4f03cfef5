// Unit tests for data
mod data_test;

// Unit tests for orchestrator
mod intent_resolver_test;

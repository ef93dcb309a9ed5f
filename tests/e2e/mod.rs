//! End-to-end tests: a client session against two live reference backends

//! Scenario tests spanning the scene graph and its visitors.

mod editing;

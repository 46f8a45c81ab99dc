// Project CRUD: many projects per owner, independent of the resume
// lifecycle.

pub mod handlers;

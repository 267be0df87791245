//! Persistence adapters

mod in_memory_department_repository;

pub use in_memory_department_repository::InMemoryDepartmentRepository;

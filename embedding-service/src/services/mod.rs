pub mod hashing_service;
pub mod ollama_service;
pub mod open_ai_service;

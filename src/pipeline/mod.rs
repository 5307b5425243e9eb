pub mod scoring; // Rule-table risk scoring
pub mod insight; // LLM narrative enrichment with fallback
pub mod analysis; // Validate → score → enrich → record

pub mod allergy_checker;
pub mod career_guidance;
pub mod clinical_case;
pub mod dose_calculator;
pub mod drug_interaction;
pub mod emergency;
pub mod flashcards;
pub mod osce;
pub mod patient_counseling;
pub mod prescription_reader;
pub mod two_step;

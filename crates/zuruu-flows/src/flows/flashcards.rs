use std::sync::LazyLock;

use zuruu_core::models::mode::Mode;

use crate::Flow;
use crate::shape::{FieldSpec, InputShape, NumericRange, OutputField, OutputKind};

pub struct FlashcardGenerator;

impl Flow for FlashcardGenerator {
    fn id(&self) -> &str {
        "flashcard_generator"
    }

    fn name(&self) -> &str {
        "Flashcard Generator"
    }

    fn description(&self) -> &str {
        "Generates study flashcards on a pharmacy topic."
    }

    fn audience(&self) -> &[Mode] {
        &[Mode::Student]
    }

    fn input_shape(&self) -> &InputShape {
        static SHAPE: LazyLock<InputShape> = LazyLock::new(|| {
            InputShape::new(vec![
                FieldSpec::text("topic", "Topic").required(),
                FieldSpec::integer("count", "Number of cards", NumericRange::between(1.0, 50.0))
                    .required(),
                FieldSpec::choice("difficulty", "Difficulty", &["easy", "medium", "hard"]),
            ])
        });
        &SHAPE
    }

    fn output_fields(&self) -> &[OutputField] {
        static FIELDS: LazyLock<Vec<OutputField>> = LazyLock::new(|| {
            vec![OutputField::new("flashcards", "Flashcards", OutputKind::List)]
        });
        &FIELDS
    }

    fn role_prompt(&self) -> &str {
        "You write concise pharmacy flashcards. Each entry of \"flashcards\" is \
         an object with \"front\" and \"back\"."
    }

    fn template(&self) -> &str {
        "Write {{ count }} flashcards on {{ topic }}.\n\
         {% if difficulty %}Difficulty: {{ difficulty }}\n{% endif %}"
    }
}

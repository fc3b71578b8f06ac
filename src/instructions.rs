use crate::llama::{Dialog, LlamaChatMessage};

/// The demonstration dialogs sent to the generator.
pub fn example_instructions() -> Vec<Dialog> {
    vec![
        vec![LlamaChatMessage::user(
            "In Bash, how do I list all text files in the current directory (excluding subdirectories) that have been modified in the last month?",
        )],
        vec![LlamaChatMessage::user(
            "What is the difference between inorder and preorder traversal? Give an example in Python.",
        )],
        vec![
            LlamaChatMessage::system("Provide answers in JavaScript"),
            LlamaChatMessage::user(
                "Write a function that computes the set of sums of all contiguous sublists of a given list.",
            ),
        ],
    ]
}

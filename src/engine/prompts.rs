// file: src/engine/prompts.rs
// description: prompt templates for answer synthesis and engine selection

use crate::models::NodeWithScore;

pub fn text_qa_prompt(context: &str, query: &str) -> String {
    format!(
        "Context information is below.\n\
         ---------------------\n\
         {context}\n\
         ---------------------\n\
         Given the context information and not prior knowledge, answer the query.\n\
         Query: {query}\n\
         Answer:"
    )
}

pub fn context_from_nodes(nodes: &[NodeWithScore]) -> String {
    nodes
        .iter()
        .map(|n| n.node.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn single_select_prompt(descriptions: &[&str], query: &str) -> String {
    let choices = descriptions
        .iter()
        .enumerate()
        .map(|(i, description)| format!("({}) {}", i + 1, description))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Some choices are given below. It is provided in a numbered list (1 to {count}), \
         where each item in the list corresponds to a summary.\n\
         ---------------------\n\
         {choices}\n\
         ---------------------\n\
         Using only the choices above and not prior knowledge, return the choice that is \
         most relevant to the question: '{query}'\n\n\
         The output should be a single JSON object of the form \
         {{\"choice\": <number>, \"reason\": <string>}} and nothing else.",
        count = descriptions.len()
    )
}

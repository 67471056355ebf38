/// Instruction wrapper interpolated around every query. The model is told to
/// answer from the supplied context alone and to admit ignorance otherwise.
pub fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "Using ONLY the following context, answer the user's question. \
         If the answer is not in the context, say you don't know.\
         \n\nContext: {}\n\nUser Question: {}",
        context, query
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_context_and_query() {
        let prompt = build_prompt("Paris is in France.", "Where is Paris?");
        assert!(prompt.starts_with("Using ONLY the following context"));
        assert!(prompt.contains("Context: Paris is in France."));
        assert!(prompt.contains("User Question: Where is Paris?"));
    }
}

use crate::recipe::InstructionRequest;

/// Build the chef prompt sent to the generative service
pub fn build_prompt(request: &InstructionRequest) -> String {
    format!(
        "You are a professional home chef.\n\
         Generate clear, easy-to-follow cooking steps for the following recipe.\n\
         \n\
         Recipe name: {name}\n\
         Ingredients: {ingredients}\n\
         \n\
         Instructions:\n\
         - Write steps in numbered format\n\
         - Keep language simple and beginner-friendly\n\
         - Each step should be short and clear\n\
         - Add a small 💡 Tip at the end\n\
         - Do NOT output markdown, just plain text with numbering\n",
        name = request.recipe_name.trim(),
        ingredients = request.ingredients.trim(),
    )
}

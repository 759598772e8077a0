use super::JobPostingInput;

/// Builds the instruction sent to the model. Same input, same prompt.
pub fn job_description_prompt(input: &JobPostingInput) -> String {
    let mut prompt = String::with_capacity(1024);
    prompt.push_str(
        "You are an expert HR professional and job description writer. \
         Create a compelling job description for the following role:\n\n",
    );
    prompt.push_str(&format!("Job Title: {}\n", input.job_title));
    prompt.push_str(&format!("Experience Level: {}\n", input.experience_level));
    prompt.push_str(&format!("Work Mode: {}\n", input.work_mode));
    prompt.push_str(&format!("Tech Stack: {}\n", input.tech_stack.join(", ")));
    if let Some(about) = input.about_company.as_deref() {
        prompt.push_str(&format!("About Company: {about}\n"));
    }
    prompt.push_str(OUTPUT_INSTRUCTIONS);
    prompt
}

const OUTPUT_INSTRUCTIONS: &str = r#"
Please generate a professional job description with the following structure:

1. About Us section (2-3 sentences about the company culture and mission)
2. Responsibilities (5-7 bullet points)
3. Required Skills (include the tech stack + soft skills, 6-8 total)
4. Benefits (5-6 attractive benefits)

Make it engaging, professional, and tailored to the tech industry. Focus on attracting top talent.

Return the response in this exact JSON format:
{
  "aboutUs": "About us text here",
  "responsibilities": ["Responsibility 1", "Responsibility 2", ...],
  "requiredSkills": ["Skill 1", "Skill 2", ...],
  "benefits": ["Benefit 1", "Benefit 2", ...]
}
"#;

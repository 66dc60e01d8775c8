//! Static stage registries. Every list is ordered, ids are 1-based and contiguous.

use serde::Serialize;

/// One screen (or bucket) in a fixed linear workflow. Defined at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub id: u32,
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

const fn stage(
    id: u32,
    slug: &'static str,
    title: &'static str,
    description: &'static str,
) -> Stage {
    Stage {
        id,
        slug,
        title,
        description,
    }
}

pub const ONBOARDING_STEPS: &[Stage] = &[
    stage(1, "welcome", "Welcome", "Introduction to the company and the onboarding journey"),
    stage(2, "personal-info", "Personal Information", "Legal name, date of birth and address"),
    stage(3, "contact-details", "Contact Details", "Phone numbers and personal email"),
    stage(4, "emergency-contacts", "Emergency Contacts", "People to reach in an emergency"),
    stage(5, "documents", "Document Upload", "Identity and right-to-work documents"),
    stage(6, "tax-information", "Tax Information", "Tax identifiers and withholding elections"),
    stage(7, "bank-details", "Bank Details", "Salary account for payroll"),
    stage(8, "benefits", "Benefits Enrollment", "Health, retirement and insurance plans"),
    stage(9, "policies", "Policy Acknowledgement", "Handbook and workplace policies"),
    stage(10, "code-of-conduct", "Code of Conduct", "Ethics and conduct agreement"),
    stage(11, "it-setup", "IT Setup", "Accounts, email and system access"),
    stage(12, "equipment", "Equipment Request", "Laptop, peripherals and accessories"),
    stage(13, "workspace", "Workspace Assignment", "Desk, office location and badge"),
    stage(14, "team-introduction", "Team Introduction", "Meet the team and key contacts"),
    stage(15, "manager-meeting", "Manager Meeting", "First one-to-one with the line manager"),
    stage(16, "training-schedule", "Training Schedule", "Role-specific training plan"),
    stage(17, "compliance-training", "Compliance Training", "Mandatory compliance modules"),
    stage(18, "goals", "Goal Setting", "First 30/60/90 day objectives"),
    stage(19, "feedback", "Feedback Survey", "Onboarding experience survey"),
    stage(20, "completion", "Completion", "Onboarding summary and sign-off"),
];

pub const PIPELINE_STAGES: &[Stage] = &[
    stage(1, "applied", "Applied", "Application received"),
    stage(2, "screening", "Screening", "Resume and requirements screening"),
    stage(3, "phone_interview", "Phone Interview", "Initial recruiter call"),
    stage(4, "technical_interview", "Technical Interview", "Skills assessment"),
    stage(5, "final_interview", "Final Interview", "Panel or leadership interview"),
    stage(6, "offer", "Offer", "Offer extended"),
    stage(7, "hired", "Hired", "Offer accepted"),
];

pub const EXIT_STEPS: &[Stage] = &[
    stage(1, "resignation", "Resignation", "Resignation submitted by the employee"),
    stage(2, "manager_approval", "Manager Approval", "Line manager reviews the resignation"),
    stage(3, "knowledge_transfer", "Knowledge Transfer", "Handover of responsibilities"),
    stage(4, "asset_return", "Asset Return", "Company equipment returned"),
    stage(5, "exit_interview", "Exit Interview", "Feedback conversation with HR"),
    stage(6, "final_settlement", "Final Settlement", "Final pay and benefits settled"),
    stage(7, "clearance", "Clearance", "Access revoked and clearance issued"),
];

pub const INTERVIEW_QUESTIONS: &[Stage] = &[
    stage(1, "introduction", "Introduction", "Tell me about yourself and your recent work."),
    stage(2, "motivation", "Motivation", "Why are you interested in this position?"),
    stage(3, "challenge", "Challenge", "Describe a difficult problem you solved and how you approached it."),
    stage(4, "teamwork", "Teamwork", "Tell me about a time you disagreed with a teammate. What happened?"),
    stage(5, "strengths", "Strengths", "What would your previous manager say is your greatest strength?"),
    stage(6, "closing", "Closing", "Where do you see yourself in three years?"),
];

pub fn find_by_slug<'a>(stages: &'a [Stage], slug: &str) -> Option<&'a Stage> {
    stages.iter().find(|s| s.slug == slug)
}

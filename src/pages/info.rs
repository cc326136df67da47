use crate::router::Route;

/// A titled block of static text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub heading: &'static str,
    pub lines: &'static [&'static str],
}

const HOME: &[Section] = &[
    Section {
        heading: "MediHelp+",
        lines: &[
            "Reliable health information, symptom triage and first aid guidance.",
            "Log in to check symptoms, browse first aid guides and find a doctor.",
        ],
    },
    Section {
        heading: "Features",
        lines: &[
            "Symptom checker: pick your symptoms and get likely causes with next steps.",
            "First aid: step-by-step guides for common emergencies.",
            "Health education: articles and videos from the MediHelp+ library.",
            "Health chat: describe how you feel and get AI guidance.",
            "Skin diagnosis: upload a photo for a quick assessment.",
            "Multi-language support: Amharic, Afaan Oromo, Tigrinya and more.",
        ],
    },
    Section {
        heading: "How it works",
        lines: &[
            "1. Tell us how you feel.",
            "2. Our AI analyzes your input together with your history.",
            "3. Receive guidance and recommended next steps.",
        ],
    },
];

const ABOUT: &[Section] = &[Section {
    heading: "Meet the team",
    lines: &[
        "MediHelp+ is built by a small team of web and backend developers.",
        "The goal is accessible, accurate and practical health information",
        "that helps people make better decisions about their well-being.",
    ],
}];

const PRIVACY: &[Section] = &[
    Section {
        heading: "Information we collect",
        lines: &[
            "Personal information such as name, email and phone number.",
            "Health data you provide, such as symptoms and medical history.",
            "Usage data, such as interactions with the AI assistant.",
        ],
    },
    Section {
        heading: "How we use it",
        lines: &[
            "To provide personalized health assistance.",
            "To improve our services and models.",
            "To comply with legal and regulatory obligations.",
        ],
    },
    Section {
        heading: "Sharing",
        lines: &[
            "With healthcare providers, only with your consent.",
            "With legal authorities when required by law.",
        ],
    },
    Section {
        heading: "Your rights",
        lines: &[
            "Access, correct or delete your data.",
            "Opt out of non-essential processing.",
            "File a complaint with a data protection authority.",
        ],
    },
];

const APPOINTMENTS: &[Section] = &[Section {
    heading: "Book an appointment",
    lines: &[
        "Select a doctor from the doctor finder, then choose one of their",
        "open availability slots. Online booking is confirmed by the clinic.",
    ],
}];

const FIND_CLINIC: &[Section] = &[Section {
    heading: "Find a clinic",
    lines: &[
        "Clinic search is not available in the terminal client yet.",
        "Use the doctor finder to contact a doctor directly.",
    ],
}];

/// Static content for the informational routes, `None` for data-driven ones
pub fn static_content(route: &Route) -> Option<&'static [Section]> {
    match route {
        Route::Home => Some(HOME),
        Route::About => Some(ABOUT),
        Route::Privacy => Some(PRIVACY),
        Route::Appointments => Some(APPOINTMENTS),
        Route::FindClinic => Some(FIND_CLINIC),
        _ => None,
    }
}

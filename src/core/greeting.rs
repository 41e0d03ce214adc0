// RPTO Leads - core/greeting.rs
//
// Canned WhatsApp texts: the first-contact message and the welcome message
// for converted leads. The wording is a fixed template; only the name and
// place vary.

/// Opening WhatsApp message for a new enquiry.
pub fn contact_message(name: &str) -> String {
    format!(
        "Hello {name}, I am contacting you from the RPTO regarding your enquiry. \
         How can I help you today?"
    )
}

/// Welcome text sent to a lead once they convert.
pub fn greeting_text(name: &str, place: &str) -> String {
    format!(
        "Dear {name},

Congratulations! We are thrilled to welcome you as a fully converted lead to the Remote Pilot Training Organisation (RPTO) family.

Your commitment to becoming a certified drone pilot is the first step in a high-flying career!

Next Steps:
1. We have sent your welcome kit to your email.
2. Our team will contact you shortly to schedule your first practical session in the {place} region.

Welcome aboard, and we look forward to helping you achieve your commercial drone pilot license!

Best Regards,
The RPTO Team"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_message() {
        let text = contact_message("Ravi");
        assert_eq!(
            text,
            concat!(
                "Hello Ravi, I am contacting you from the RPTO regarding your enquiry.",
                " How can I help you today?"
            )
        );
    }

    #[test]
    fn test_greeting_interpolates_name_and_place() {
        let text = greeting_text("Jane Doe", "Delhi");
        assert!(text.starts_with("Dear Jane Doe,\n\nCongratulations!"));
        assert!(text.contains("practical session in the Delhi region."));
        assert!(text.ends_with("Best Regards,\nThe RPTO Team"));
    }
}

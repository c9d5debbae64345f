//! Supported conversation languages and the fixed per-language tables that hang off
//! them: model directives, synthesis voices, greetings and fallback replies.
//!
//! The current language is always passed explicitly; nothing here is global state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Voice used when a request names a language we have no voice for.
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Tamil,
    Telugu,
    Bengali,
    Marathi,
    Gujarati,
    Kannada,
    Malayalam,
    Punjabi,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::English,
        Language::Hindi,
        Language::Tamil,
        Language::Telugu,
        Language::Bengali,
        Language::Marathi,
        Language::Gujarati,
        Language::Kannada,
        Language::Malayalam,
        Language::Punjabi,
    ];

    /// Resolve a wire tag, falling back to English for anything unrecognised.
    pub fn from_tag_or_default(tag: Option<&str>) -> Self {
        tag.and_then(|t| t.parse().ok()).unwrap_or_default()
    }

    pub fn tag(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
            Language::Tamil => "tamil",
            Language::Telugu => "telugu",
            Language::Bengali => "bengali",
            Language::Marathi => "marathi",
            Language::Gujarati => "gujarati",
            Language::Kannada => "kannada",
            Language::Malayalam => "malayalam",
            Language::Punjabi => "punjabi",
        }
    }

    /// Directive appended to the assistant's system prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            Language::English => "Respond in English.",
            Language::Hindi => "Respond in Hindi (हिन्दी).",
            Language::Tamil => "Respond in Tamil (தமிழ்).",
            Language::Telugu => "Respond in Telugu (తెలుగు).",
            Language::Bengali => "Respond in Bengali (বাংলা).",
            Language::Marathi => "Respond in Marathi (मराठी).",
            Language::Gujarati => "Respond in Gujarati (ગુજરાતી).",
            Language::Kannada => "Respond in Kannada (ಕನ್ನಡ).",
            Language::Malayalam => "Respond in Malayalam (മലയാളം).",
            Language::Punjabi => "Respond in Punjabi (ਪੰਜਾਬੀ).",
        }
    }

    pub fn voice_id(self) -> &'static str {
        match self {
            Language::English => DEFAULT_VOICE_ID,
            Language::Hindi => "pNInz6obpgDQGcFmaJgB",
            Language::Tamil => "EXAVITQu4vr4xnSDxMaL",
            Language::Telugu => "ErXwobaYiN019PkySvjV",
            Language::Bengali => "MF3mGyEYCl7XYWbV9V6O",
            Language::Marathi => "TxGEqnHWrfWFTfGW9XjX",
            Language::Gujarati => "VR6AewLTigWG4xSOukaG",
            Language::Kannada => "pqHfZKP75CvOlQylNhV4",
            Language::Malayalam => "AZnzlk1XvdvUeBnXmlld",
            Language::Punjabi => "yoZ06aMxZJJ28mfd3POQ",
        }
    }

    /// Opening assistant turn for a chat session, also appended on a language switch.
    pub fn greeting(self) -> &'static str {
        match self {
            Language::English => {
                "Hello! I'm your health insurance assistant. How can I help you today?"
            }
            Language::Hindi => {
                "नमस्ते! मैं आपका स्वास्थ्य बीमा सहायक हूं। आज मैं आपकी कैसे मदद कर सकता हूं?"
            }
            Language::Tamil => {
                "வணக்கம்! நான் உங்கள் சுகாதார காப்பீட்டு உதவியாளர். இன்று நான் உங்களுக்கு எப்படி உதவ முடியும்?"
            }
            Language::Telugu => "హలో! నేను మీ ఆరోగ్య బీమా సహాయకుడిని. నేడు నేను మీకు ఎలా సహాయం చేయగలను?",
            Language::Bengali => {
                "হ্যালো! আমি আপনার স্বাস্থ্য বীমা সহকারী। আজ আমি আপনাকে কীভাবে সাহায্য করতে পারি?"
            }
            Language::Marathi => {
                "नमस्कार! मी तुमचा आरोग्य विमा सहाय्यक आहे. आज मी तुम्हाला कशी मदत करू शकतो?"
            }
            Language::Gujarati => {
                "નમસ્તે! હું તમારો આરોગ્ય વીમા સહાયક છું. આજે હું તમને કેવી રીતે મદદ કરી શકું?"
            }
            Language::Kannada => "ಹಲೋ! ನಾನು ನಿಮ್ಮ ಆರೋಗ್ಯ ವಿಮಾ ಸಹಾಯಕ. ಇಂದು ನಾನು ನಿಮಗೆ ಹೇಗೆ ಸಹಾಯ ಮಾಡಬಹುದು?",
            Language::Malayalam => {
                "ഹലോ! ഞാൻ നിങ്ങളുടെ ആരോഗ്യ ഇൻഷുറൻസ് അസിസ്റ്റന്റ് ആണ്. ഇന്ന് എനിക്ക് നിങ്ങളെ എങ്ങനെ സഹായിക്കാൻ കഴിയും?"
            }
            Language::Punjabi => {
                "ਹੈਲੋ! ਮੈਂ ਤੁਹਾਡਾ ਸਿਹਤ ਬੀਮਾ ਸਹਾਇਕ ਹਾਂ। ਅੱਜ ਮੈਂ ਤੁਹਾਡੀ ਕਿਵੇਂ ਮਦਦ ਕਰ ਸਕਦਾ ਹਾਂ?"
            }
        }
    }

    /// Reply used when the language model cannot be reached.
    pub fn apology(self) -> &'static str {
        match self {
            Language::Hindi => {
                "मुझे खेद है, मुझे अपने ज्ञान आधार से जुड़ने में समस्या हो रही है। कृपया बाद में पुनः प्रयास करें।"
            }
            Language::Tamil => {
                "மன்னிக்கவும், எனது அறிவுத் தளத்துடன் இணைப்பதில் எனக்கு சிரமம் ஏற்படுகிறது. தயவுசெய்து பின்னர் மீண்டும் முயற்சிக்கவும்."
            }
            _ => {
                "I'm sorry, I'm having trouble connecting to my knowledge base. Please try again later."
            }
        }
    }

    /// Fixed reply for the legacy simulated chat endpoint.
    pub fn canned_reply(self) -> &'static str {
        match self {
            Language::Hindi => {
                "मुझे समझ में आता है कि आप स्वास्थ्य बीमा जानकारी की तलाश कर रहे हैं। मैं आपकी और कैसे सहायता कर सकता हूं?"
            }
            Language::Tamil => {
                "நீங்கள் சுகாதார காப்பீட்டுத் தகவல்களைத் தேடுகிறீர்கள் என்பதை நான் புரிந்துகொள்கிறேன். நான் உங்களுக்கு மேலும் எவ்வாறு உதவ முடியும்?"
            }
            _ => {
                "I understand you're looking for health insurance information. How can I assist you further?"
            }
        }
    }
}

/// Voice for a raw language tag; unknown tags get [`DEFAULT_VOICE_ID`].
pub fn voice_for_tag(tag: Option<&str>) -> &'static str {
    tag.and_then(|t| t.parse::<Language>().ok())
        .map(Language::voice_id)
        .unwrap_or(DEFAULT_VOICE_ID)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language: {}", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.tag() == normalized)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_and_unknown_tags() {
        assert_eq!("hindi".parse::<Language>().unwrap(), Language::Hindi);
        assert_eq!(" Tamil ".parse::<Language>().unwrap(), Language::Tamil);
        assert!("klingon".parse::<Language>().is_err());
        assert_eq!(Language::from_tag_or_default(Some("klingon")), Language::English);
        assert_eq!(Language::from_tag_or_default(None), Language::English);
    }

    #[test]
    fn test_tags_round_trip_for_every_language() {
        for lang in Language::ALL {
            assert_eq!(lang.tag().parse::<Language>().unwrap(), lang);
            assert!(lang.instruction().starts_with("Respond in"));
            assert!(!lang.greeting().is_empty());
        }
    }

    #[test]
    fn test_fallback_strings_default_to_english() {
        assert_eq!(Language::Punjabi.apology(), Language::English.apology());
        assert_eq!(Language::Kannada.canned_reply(), Language::English.canned_reply());
        assert_ne!(Language::Hindi.apology(), Language::English.apology());
    }

    #[test]
    fn test_voice_lookup() {
        assert_eq!(voice_for_tag(Some("hindi")), Language::Hindi.voice_id());
        assert_eq!(voice_for_tag(Some("swahili")), DEFAULT_VOICE_ID);
        assert_eq!(voice_for_tag(None), DEFAULT_VOICE_ID);
    }

    #[test]
    fn test_serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&Language::Malayalam).unwrap();
        assert_eq!(json, "\"malayalam\"");
        let lang: Language = serde_json::from_str("\"gujarati\"").unwrap();
        assert_eq!(lang, Language::Gujarati);
    }
}

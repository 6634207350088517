use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shown when the predictor answers without any recognizable label field.
pub const UNRECOGNIZED_FOOD: &str = "Makanan tidak dikenali";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "Surabaya Barat")]
    SurabayaBarat,
    #[serde(rename = "Surabaya Timur")]
    SurabayaTimur,
    #[serde(rename = "Surabaya Pusat")]
    SurabayaPusat,
    #[serde(rename = "Surabaya Utara")]
    SurabayaUtara,
    #[serde(rename = "Surabaya Selatan")]
    SurabayaSelatan,
}

impl Location {
    pub const ALL: [Location; 5] = [
        Location::SurabayaBarat,
        Location::SurabayaTimur,
        Location::SurabayaPusat,
        Location::SurabayaUtara,
        Location::SurabayaSelatan,
    ];

    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "surabaya barat" | "barat" => Some(Location::SurabayaBarat),
            "surabaya timur" | "timur" => Some(Location::SurabayaTimur),
            "surabaya pusat" | "pusat" => Some(Location::SurabayaPusat),
            "surabaya utara" | "utara" => Some(Location::SurabayaUtara),
            "surabaya selatan" | "selatan" => Some(Location::SurabayaSelatan),
            _ => None,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Location::SurabayaBarat => "Surabaya Barat",
            Location::SurabayaTimur => "Surabaya Timur",
            Location::SurabayaPusat => "Surabaya Pusat",
            Location::SurabayaUtara => "Surabaya Utara",
            Location::SurabayaSelatan => "Surabaya Selatan",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodType {
    Manis,
    Asam,
    Pedas,
    Asin,
    Gurih,
}

impl FoodType {
    pub const ALL: [FoodType; 5] = [
        FoodType::Manis,
        FoodType::Asam,
        FoodType::Pedas,
        FoodType::Asin,
        FoodType::Gurih,
    ];

    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "manis" => Some(FoodType::Manis),
            "asam" => Some(FoodType::Asam),
            "pedas" => Some(FoodType::Pedas),
            "asin" => Some(FoodType::Asin),
            "gurih" => Some(FoodType::Gurih),
            _ => None,
        }
    }
}

impl std::fmt::Display for FoodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FoodType::Manis => "Manis",
            FoodType::Asam => "Asam",
            FoodType::Pedas => "Pedas",
            FoodType::Asin => "Asin",
            FoodType::Gurih => "Gurih",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealTime {
    Sarapan,
    #[serde(rename = "Makan Siang")]
    MakanSiang,
    #[serde(rename = "Makan Malam")]
    MakanMalam,
}

impl MealTime {
    pub const ALL: [MealTime; 3] =
        [MealTime::Sarapan, MealTime::MakanSiang, MealTime::MakanMalam];

    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sarapan" | "breakfast" => Some(MealTime::Sarapan),
            "makan siang" | "siang" | "lunch" => Some(MealTime::MakanSiang),
            "makan malam" | "malam" | "dinner" => Some(MealTime::MakanMalam),
            _ => None,
        }
    }
}

impl std::fmt::Display for MealTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MealTime::Sarapan => "Sarapan",
            MealTime::MakanSiang => "Makan Siang",
            MealTime::MakanMalam => "Makan Malam",
        };
        write!(f, "{}", s)
    }
}

/// Request body for the recommendation backend. Field names follow the
/// backend's camelCase contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodPreferences {
    pub location: Location,
    pub food_type: FoodType,
    pub meal_time: MealTime,
    pub budget: f64,
    pub number_of_people: u32,
}

impl Default for FoodPreferences {
    fn default() -> Self {
        Self {
            location: Location::SurabayaBarat,
            food_type: FoodType::Asin,
            meal_time: MealTime::MakanSiang,
            budget: 75_000.0,
            number_of_people: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub name: String,
    pub rating: f64,
    pub open_hours: String,
    pub address: String,
    pub description: Option<String>,
}

/// One recommended dish with the quantity the backend sized for the party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub total: f64,
}

/// Server-computed recommendation. The backend guarantees the arithmetic
/// (line totals, subtotal, savings); the client only formats it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecommendation {
    pub restaurant: Restaurant,
    pub menu: Vec<MenuItem>,
    pub subtotal: f64,
    pub savings: f64,
    pub total_budget: f64,
}

/// Body of a /predict answer. Different predictor builds name the label
/// field differently, so every known variant is optional here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionResponse {
    pub food_name: Option<String>,
    pub prediction: Option<String>,
    pub label: Option<String>,
    pub predicted_class: Option<String>,
    pub confidence: Option<f64>,
    pub error: Option<String>,
}

impl PredictionResponse {
    /// First present label field wins; the order is fixed.
    pub fn detected_label(&self) -> String {
        [
            &self.food_name,
            &self.prediction,
            &self.label,
            &self.predicted_class,
        ]
        .into_iter()
        .find_map(|field| field.clone())
        .unwrap_or_else(|| UNRECOGNIZED_FOOD.to_string())
    }
}

/// Ephemeral record of the image the user picked for detection.
#[derive(Debug, Clone)]
pub struct ImageSelection {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub selected_at: DateTime<Utc>,
}

/// Rupiah formatting: "Rp " prefix, dot-grouped thousands, no decimals
/// (id-ID convention). Negative amounts keep the sign in front of "Rp".
pub fn format_rupiah(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

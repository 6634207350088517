use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

use crate::config::Config;
use crate::flows::mealplan::format_recommendation;
use crate::flows::{DetectorFlow, FlowState, MealplanFlow};
use crate::models::{format_rupiah, FoodType, Location, MealTime};
use crate::services::{PredictorClient, RecommendationClient};

/// Interactive terminal session routing the user between the two flows.
/// Each flow owns its own state; the session only drives input and output.
pub struct Session {
    mealplan: MealplanFlow,
    detector: DetectorFlow,
    reader: BufReader<Stdin>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let backend = config
            .recommendations_url()
            .map(|url| Arc::new(RecommendationClient::new(url)) as Arc<dyn crate::services::RecommendationApi>);
        let predictor = config
            .predict_url()
            .map(|url| Arc::new(PredictorClient::new(url)) as Arc<dyn crate::services::PredictorApi>);

        Self {
            mealplan: MealplanFlow::new(backend),
            detector: DetectorFlow::new(predictor),
            reader: BufReader::new(tokio::io::stdin()),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            println!();
            println!("=== Mealplan ===");
            println!("  1. Cari rekomendasi makanan");
            println!("  2. Deteksi makanan dari foto");
            println!("  3. Keluar");

            let choice = self.prompt("Pilihan").await?;
            match choice.trim() {
                "1" => self.run_mealplan().await?,
                "2" => self.run_detector().await?,
                "3" | "q" | "keluar" => break,
                "" => continue,
                other => println!("Perintah '{}' tidak dikenali.", other),
            }
        }
        Ok(())
    }

    async fn prompt(&mut self, label: &str) -> Result<String> {
        use std::io::Write;
        print!("{}: ", label);
        std::io::stdout().flush()?;

        let mut line = String::new();
        self.reader.read_line(&mut line).await?;
        Ok(line.trim().to_string())
    }

    async fn run_mealplan(&mut self) -> Result<()> {
        println!();
        println!("Lagi bingung mau makan apa? Biarin AI yang cariin!");
        println!("(Enter kosong mempertahankan nilai saat ini)");

        let location = self.mealplan.preferences().location;
        println!("\nPilih Lokasi yang diinginkan:");
        let answer = self.prompt_options(&Location::ALL, location).await?;
        let location = pick(&answer, &Location::ALL, location, Location::from_string);
        self.mealplan.set_location(location);

        let food_type = self.mealplan.preferences().food_type;
        println!("\nPreferensi Makanan:");
        let answer = self.prompt_options(&FoodType::ALL, food_type).await?;
        let food_type = pick(&answer, &FoodType::ALL, food_type, FoodType::from_string);
        self.mealplan.set_food_type(food_type);

        let meal_time = self.mealplan.preferences().meal_time;
        println!("\nWaktu Makan:");
        let answer = self.prompt_options(&MealTime::ALL, meal_time).await?;
        let meal_time = pick(&answer, &MealTime::ALL, meal_time, MealTime::from_string);
        self.mealplan.set_meal_time(meal_time);

        let current_budget = self.mealplan.preferences().budget;
        let answer = self
            .prompt(&format!("\nBudget Makanan [{}]", format_rupiah(current_budget)))
            .await?;
        self.mealplan
            .set_budget(pick_number(&answer, current_budget, 0.0));

        let current_people = self.mealplan.preferences().number_of_people;
        let answer = self
            .prompt(&format!("Jumlah Orang [{}]", current_people))
            .await?;
        self.mealplan
            .set_number_of_people(pick_number(&answer, current_people, 1));

        println!("\nMencari rekomendasi...");
        match self.mealplan.submit().await {
            FlowState::Success(recommendation) => {
                println!("\n=== Rekomendasi Restoran ===");
                print!("{}", format_recommendation(recommendation));
            }
            FlowState::Failed(message) => println!("\n⚠️ {}", message),
            _ => {}
        }

        // Kembali: back to the menu with the form re-seeded.
        self.mealplan.reset();
        Ok(())
    }

    async fn prompt_options<T: Display + PartialEq + Copy>(
        &mut self,
        options: &[T],
        current: T,
    ) -> Result<String> {
        for (i, option) in options.iter().enumerate() {
            let marker = if *option == current { "●" } else { " " };
            println!("  {} {}. {}", marker, i + 1, option);
        }
        self.prompt("Pilihan").await
    }

    async fn run_detector(&mut self) -> Result<()> {
        println!();
        println!("Kenali Rasa Suroboyo — unggah foto makananmu!");

        let answer = self.prompt("Path gambar makanan (kosong untuk batal)").await?;
        if answer.is_empty() {
            println!("Dibatalkan.");
            return Ok(());
        }

        if let Err(e) = self.detector.select_file(Path::new(&answer)) {
            println!("⚠️ {}", e);
            return Ok(());
        }

        if let (Some(selection), Some(preview)) =
            (self.detector.selection(), self.detector.preview_path())
        {
            println!(
                "Pratinjau Foto: {} ({}, dipilih {})",
                preview.display(),
                selection.file_name,
                selection.selected_at.format("%H:%M:%S")
            );
        }

        println!("Menganalisis...");
        match self.detector.submit().await {
            FlowState::Success(label) => println!("\n🍜 {}", label),
            FlowState::Failed(message) => println!("\n⚠️ {}", message),
            _ => {}
        }

        self.detector.reset();
        Ok(())
    }
}

/// Resolves a categorical answer: empty keeps the current value, a 1-based
/// index picks from the list, anything else is parsed by name; unparseable
/// input keeps the current value.
fn pick<T: Copy>(
    input: &str,
    options: &[T],
    current: T,
    parse: fn(&str) -> Option<T>,
) -> T {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return current;
    }
    if let Ok(index) = trimmed.parse::<usize>() {
        if index >= 1 && index <= options.len() {
            return options[index - 1];
        }
    }
    parse(trimmed).unwrap_or_else(|| {
        log::warn!("Unrecognized choice '{}', keeping current", trimmed);
        current
    })
}

/// Free-form number input: empty keeps the current value; parsed values are
/// clamped to the minimum; garbage keeps the current value.
fn pick_number<N: std::str::FromStr + PartialOrd + Copy>(input: &str, current: N, min: N) -> N {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return current;
    }
    match trimmed.parse::<N>() {
        Ok(value) if value >= min => value,
        Ok(_) => min,
        Err(_) => {
            log::warn!("Unrecognized number '{}', keeping current", trimmed);
            current
        }
    }
}

//! Generate a deterministic, COMPAS-shaped sample dataset so the dashboard
//! pipeline can be exercised without the published data: prior convictions
//! drive the risk score, and the score drives the recidivism probability.

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Pick one entry, weighted by the second tuple element.
    fn pick<'a>(&mut self, options: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = options.iter().map(|(_, w)| w).sum();
        let mut roll = self.next_f64() * total;
        for &(value, weight) in options {
            if roll < weight {
                return value;
            }
            roll -= weight;
        }
        options.last().map(|(v, _)| *v).unwrap_or("")
    }
}

fn age_category(age: u32) -> &'static str {
    if age < 25 {
        "Less than 25"
    } else if age <= 45 {
        "25 - 45"
    } else {
        "Greater than 45"
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_rows = 600usize;

    let races: [(&str, f64); 6] = [
        ("African-American", 0.40),
        ("Caucasian", 0.32),
        ("Hispanic", 0.14),
        ("Asian", 0.04),
        ("Native American", 0.02),
        ("Other", 0.08),
    ];
    let sexes: [(&str, f64); 2] = [("Male", 0.78), ("Female", 0.22)];
    let charges: [(&str, f64); 6] = [
        ("Battery", 0.25),
        ("Grand Theft", 0.20),
        ("Possession of Cannabis", 0.18),
        ("Driving Under the Influence", 0.15),
        ("Burglary", 0.12),
        ("Fraud", 0.10),
    ];
    let states: [(&str, f64); 4] = [("FL", 0.70), ("NY", 0.12), ("CA", 0.10), ("TX", 0.08)];

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record([
            "name",
            "race",
            "sex",
            "age",
            "age_cat",
            "priors_count",
            "decile_score",
            "two_year_recid",
            "c_charge_desc",
            "state",
        ])
        .expect("Failed to write header");

    let mut recid_total = 0usize;
    for i in 0..n_rows {
        let race = rng.pick(&races);
        let sex = rng.pick(&sexes);
        let charge = rng.pick(&charges);
        let state = rng.pick(&states);

        let age = rng.gauss(35.0, 12.0).round().clamp(18.0, 80.0) as u32;
        // Roughly geometric prior-conviction counts.
        let priors = (-(1.0 - rng.next_f64()).ln() * 2.5).floor().min(40.0) as i64;
        let score = (1.0 + priors as f64 * 0.3 + rng.gauss(0.0, 1.5))
            .round()
            .clamp(1.0, 10.0) as u8;
        let recid_prob = 0.08 + 0.055 * score as f64;
        let recid = u8::from(rng.next_f64() < recid_prob);
        recid_total += recid as usize;

        // Leave a few ages blank so the scatter's drop policy has work to do.
        let age_cell = if i % 75 == 40 {
            String::new()
        } else {
            age.to_string()
        };

        let name = format!("Sample {i:04}");
        let priors_cell = priors.to_string();
        let score_cell = score.to_string();
        let recid_cell = recid.to_string();
        writer
            .write_record([
                name.as_str(),
                race,
                sex,
                age_cell.as_str(),
                age_category(age),
                priors_cell.as_str(),
                score_cell.as_str(),
                recid_cell.as_str(),
                charge,
                state,
            ])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush output file");

    println!(
        "Wrote {n_rows} records ({recid_total} recidivists) to {output_path}"
    );
}

use chrono::{Duration, NaiveDate};

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

    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Generate `sample.csv`: two months of hourly smart-home readings with a
/// strict-format timestamp column, so the viewer has something to open.
fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let rooms = ["kitchen", "living_room", "bedroom", "garage"];

    let mut writer = csv::Writer::from_path("sample.csv")?;
    writer.write_record(["timestamp", "power_w", "temperature_c", "room"])?;

    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .expect("valid date")
        .and_hms_opt(0, 0, 0)
        .expect("valid time");

    for hour in 0..(60 * 24) {
        let ts = start + Duration::hours(hour);
        let daily = (hour % 24) as f64 / 24.0 * std::f64::consts::TAU;
        let power = 180.0 + 120.0 * daily.sin() + rng.uniform() * 40.0;
        let temperature = 19.5 + 3.0 * daily.sin() + rng.uniform();
        let room = rooms[(rng.next_u64() % rooms.len() as u64) as usize];

        // Sprinkle a few gaps so null handling is visible in the app.
        let power_field = if rng.uniform() < 0.01 {
            String::new()
        } else {
            format!("{power:.1}")
        };

        writer.write_record([
            ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            power_field,
            format!("{temperature:.2}"),
            room.to_string(),
        ])?;
    }

    writer.flush()?;
    println!("Wrote sample.csv");
    Ok(())
}

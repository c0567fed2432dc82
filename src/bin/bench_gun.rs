use quadlife::*;

fn main() {
    let pattern = Pattern::from_plaintext(library::GOSPER_GLIDER_GUN).unwrap();
    for speed in [8, 12, 16, 20, 24, 28, 32] {
        let mut engine = HashLifeEngine::new();
        engine.load_pattern(&pattern).unwrap();

        let timer = std::time::Instant::now();
        engine.step(speed).unwrap();
        let elapsed = timer.elapsed();
        // every 30 generations a new glider of 5 cells is emitted
        println!(
            "speed={} time={} population={} level={}",
            speed,
            elapsed.as_secs_f64(),
            engine.population(),
            engine.level()
        );
        println!("{}", engine.report());
    }
}

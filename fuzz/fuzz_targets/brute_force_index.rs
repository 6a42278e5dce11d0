use clats::BruteForce;
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if data.len() < 10 {
                return;
            }
            let length = usize::from(data[0] % 6) + 1;
            let alphabet: String = data[1..]
                .iter()
                .take(8)
                .map(|b| char::from(b'a' + b % 26))
                .collect();
            let Ok(space) = BruteForce::new(&alphabet, length) else {
                return;
            };
            let index = u64::from(data[9]) % space.size();
            let direct = space.candidate_at(index);
            let walked = space.iter_range(index..index + 1).next();
            assert_eq!(direct, walked);
        });
    }
}

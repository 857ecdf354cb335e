use spreduce::{BitmapMatrix, Engine, FullMatrix, Matrix, Monoid, ReduceConfig, SparseMatrixCSR};

fn main() -> spreduce::Result<()> {
    println!("spreduce {}: parallel monoid reductions", spreduce::VERSION);

    let config = ReduceConfig::from_env()?;
    println!("\nConfiguration:");
    println!("  Threads: {}", config.system_params.n_threads);
    println!("  Chunk: {} entries", config.chunk);
    println!("  Terminal check every {} panel(s)", config.terminal_check_panels);
    println!("  Disabled: {:?}", config.disabled);
    let engine = Engine::new(config)?;

    // A dense column
    let a = Matrix::from(FullMatrix::column((1..=10u64).collect()));
    println!("\nDense column 1..=10:");
    println!("  plus  = {}", engine.reduce(&a, &Monoid::plus())?);
    println!("  times = {}", engine.reduce(&a, &Monoid::times())?);
    println!("  max   = {}", engine.reduce(&a, &Monoid::max())?);

    // A sparse matrix with one deleted entry
    let mut csr = SparseMatrixCSR::new(
        3, 3,
        vec![0, 2, 3, 5],
        vec![0, 1, 1, 0, 2],
        vec![1i32, 2, 3, 4, 5],
    );
    csr.mark_zombie(2);
    println!("\nSparse matrix with a zombie:");
    println!("{:?}", csr);
    let s = Matrix::from(csr);
    println!("  live entries = {}", s.n_live());
    println!("  plus = {}", engine.reduce(&s, &Monoid::plus())?);

    // A bitmap with two present entries
    let mut bitmap = BitmapMatrix::empty(2, 2, 0u8);
    bitmap.insert(0, 1, 0b1010);
    bitmap.insert(1, 0, 0b0110);
    let b = Matrix::from(bitmap);
    println!("\nBitmap with two entries:");
    println!("  bor  = {:#06b}", engine.reduce(&b, &Monoid::bor())?);
    println!("  band = {:#06b}", engine.reduce(&b, &Monoid::band())?);

    // Tuples with repeated indices
    let indices = [3, 1, 3, 0, 1, 3];
    let values = [1.5f64, 2.0, 2.5, 4.0, 1.0, 3.0];
    let (out_indices, out_values) = engine.build(&indices, &values, &Monoid::plus())?;
    println!("\nBuild with duplicates summed:");
    for (i, v) in out_indices.iter().zip(&out_values) {
        println!("  {} -> {}", i, v);
    }

    Ok(())
}

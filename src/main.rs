//! Benchmark harness: dense vs sequential vs parallel SpGEMM on random matrices.

use std::process;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::info;

use gustav::constants::{DEFAULT_SEED, DEFAULT_TOLERANCE, PERCENTAGE_CONVERSION_FACTOR};
use gustav::{
    dense_multiply, find_mismatch, generate_sparse_grid, multiply, multiply_parallel,
    SparseMatrixCSR, SpgemmError,
};

#[derive(Parser, Debug)]
#[command(name = "gustav")]
#[command(version, about = "Time dense, sequential sparse and parallel sparse matrix multiplication")]
struct Cli {
    /// Dimension N of the two random N×N operands.
    matrix_size: usize,

    /// Fraction of zero cells, in [0.0, 1.0).
    sparsity: f64,

    /// Seed for the matrix generator.
    #[arg(default_value_t = DEFAULT_SEED)]
    seed: u64,
}

impl Cli {
    /// Rejects values clap accepts but the harness cannot run with
    fn validate(&self) -> Result<(), &'static str> {
        if self.matrix_size == 0 {
            return Err("matrix_size must be positive");
        }
        if !(0.0..1.0).contains(&self.sparsity) {
            return Err("sparsity must be in [0.0, 1.0)");
        }
        Ok(())
    }
}

fn usage_error(message: &str) -> ! {
    eprintln!("Error: {message}");
    eprintln!("{}", Cli::command().render_usage());
    process::exit(1);
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn run(cli: &Cli) -> Result<bool, SpgemmError> {
    let n = cli.matrix_size;

    println!("Matrix size: {}x{}", n, n);
    println!("Sparsity: {}%", cli.sparsity * PERCENTAGE_CONVERSION_FACTOR);
    println!("Seed: {}", cli.seed);

    // B uses the next seed so the operands differ
    let grid_a = generate_sparse_grid(n, cli.sparsity, cli.seed).mapv(f64::from);
    let grid_b = generate_sparse_grid(n, cli.sparsity, cli.seed.wrapping_add(1)).mapv(f64::from);

    let start = Instant::now();
    let dense = dense_multiply(&grid_a, &grid_b)?;
    let time_dense = elapsed_ms(start);

    let a = SparseMatrixCSR::from_dense(&grid_a)?;
    let b = SparseMatrixCSR::from_dense(&grid_b)?;
    info!("operands built: nnz(A) = {}, nnz(B) = {}", a.nnz(), b.nnz());

    let start = Instant::now();
    let c_single = multiply(&a, &b)?;
    let time_single = elapsed_ms(start);

    let start = Instant::now();
    let c_parallel = multiply_parallel(&a, &b)?;
    let time_parallel = elapsed_ms(start);

    info!(
        "products: nnz(sequential) = {}, nnz(parallel) = {}",
        c_single.nnz(),
        c_parallel.nnz()
    );

    println!("Dense time:         {:.3} ms", time_dense);
    println!("Sparse single:      {:.3} ms", time_single);
    println!("Sparse parallel:    {:.3} ms", time_parallel);
    println!("Speedup vs dense:   {:.3}x", time_dense / time_parallel);
    println!("Speedup vs single:  {:.3}x", time_single / time_parallel);

    match find_mismatch(&c_parallel.to_dense()?, &dense, DEFAULT_TOLERANCE) {
        Some((i, j)) => {
            println!("Mismatch at ({},{})", i, j);
            Ok(false)
        }
        None => Ok(true),
    }
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    if let Err(message) = cli.validate() {
        usage_error(message);
    }

    match run(&cli) {
        Ok(true) => println!("PASS"),
        Ok(false) => println!("FAIL"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

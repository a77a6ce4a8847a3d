use wav_codec::{EncodeOptions, WavCodecResult};

pub fn main() -> WavCodecResult<()> {
    // create and write a basic signal and read it back
    let sample_rate = 44_100;
    let sine_wave: Vec<f32> = (0..sample_rate as usize)
        .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate as f32).sin())
        .collect();

    wav_codec::write(
        "./sine_wave.wav",
        &[sine_wave.clone()],
        &EncodeOptions::new(sample_rate).with_floating_point(true),
    )?;

    let read_back = wav_codec::read("./sine_wave.wav")?;
    assert_eq!(
        read_back.channel_data,
        vec![sine_wave],
        "Written and read sine waves are not equal!"
    );
    println!("{}", read_back);
    println!("{:#}", wav_codec::info("./sine_wave.wav")?);
    Ok(())
}

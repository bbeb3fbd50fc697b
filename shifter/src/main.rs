fn main() {
    shifter::commands::main()
}

fn main() {
    periochart_lib::run()
}
